//! In-memory storage backend.
//!
//! Keeps checklists and items in maps behind `Arc<RwLock<_>>`. Nothing is
//! persisted, which makes it the backend of choice for tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use carcheck::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::InMemoryRepository;
