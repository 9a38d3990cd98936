//! SQLite storage backend.
//!
//! Uses `rusqlite` for the synchronous database work and `tokio-rusqlite` to
//! run it off the async runtime.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
