//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// Connection settings applied before the schema.
///
/// Foreign keys are off by default in SQLite and must be enabled on every
/// connection for the item cascade to fire.
pub const CONNECTION_PRAGMAS: &str = r#"
PRAGMA foreign_keys = ON;
"#;

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Inspection sessions
CREATE TABLE IF NOT EXISTS checklists (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    car_info TEXT NOT NULL DEFAULT '',
    vin TEXT NOT NULL DEFAULT '',
    last_modified TEXT NOT NULL
);

-- Questions and answers of a checklist
CREATE TABLE IF NOT EXISTS checklist_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    checklist_id INTEGER NOT NULL,
    section TEXT NOT NULL,
    question TEXT NOT NULL,
    type TEXT NOT NULL,
    options TEXT NOT NULL DEFAULT '[]',
    value TEXT,
    FOREIGN KEY (checklist_id) REFERENCES checklists(id) ON DELETE CASCADE
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_checklist_items_checklist_id ON checklist_items(checklist_id);
CREATE INDEX IF NOT EXISTS idx_checklists_last_modified ON checklists(last_modified);
"#;

// Checklist queries
pub const INSERT_CHECKLIST: &str = r#"
INSERT INTO checklists (date, car_info, vin, last_modified)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const SELECT_CHECKLIST_BY_ID: &str = r#"
SELECT id, date, car_info, vin, last_modified
FROM checklists
WHERE id = ?1
"#;

pub const SELECT_ALL_CHECKLISTS: &str = r#"
SELECT id, date, car_info, vin, last_modified
FROM checklists
ORDER BY last_modified DESC, id DESC
"#;

pub const UPDATE_CHECKLIST: &str = r#"
UPDATE checklists
SET date = ?2, car_info = ?3, vin = ?4, last_modified = ?5
WHERE id = ?1
"#;

pub const TOUCH_CHECKLIST: &str = r#"
UPDATE checklists
SET last_modified = ?2
WHERE id = ?1
"#;

pub const DELETE_CHECKLIST: &str = r#"
DELETE FROM checklists
WHERE id = ?1
"#;

// Item queries
pub const INSERT_ITEM: &str = r#"
INSERT INTO checklist_items (checklist_id, section, question, type, options, value)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_ITEM_BY_ID: &str = r#"
SELECT id, checklist_id, section, question, type, options, value
FROM checklist_items
WHERE id = ?1
"#;

pub const SELECT_ITEMS_BY_CHECKLIST: &str = r#"
SELECT id, checklist_id, section, question, type, options, value
FROM checklist_items
WHERE checklist_id = ?1
ORDER BY id ASC
"#;

pub const COUNT_ITEMS_BY_CHECKLIST: &str = r#"
SELECT COUNT(*)
FROM checklist_items
WHERE checklist_id = ?1
"#;

pub const UPDATE_ITEM: &str = r#"
UPDATE checklist_items
SET checklist_id = ?2, section = ?3, question = ?4, type = ?5, options = ?6, value = ?7
WHERE id = ?1
"#;

pub const DELETE_ITEM: &str = r#"
DELETE FROM checklist_items
WHERE id = ?1
"#;

pub const DELETE_ITEMS_BY_CHECKLIST: &str = r#"
DELETE FROM checklist_items
WHERE checklist_id = ?1
"#;
