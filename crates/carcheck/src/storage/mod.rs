//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `carcheck_core::storage`, selected with feature flags.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): file-backed store using `rusqlite` and `tokio-rusqlite`
//! - `inmemory` (default): map-backed store for tests and throwaway sessions

#[cfg(not(any(feature = "sqlite", feature = "inmemory")))]
compile_error!(
    "No storage backend selected. Enable the 'sqlite' or 'inmemory' feature. \
    Example: cargo build -p carcheck --features sqlite"
);

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRepository;
