//! carcheck - classic car pre-purchase inspection checklists.
//!
//! The [`ChecklistService`] is the entry point: it validates input, stamps
//! timestamps, materializes the question catalog and publishes changes for
//! live queries. Persistence lives behind the `carcheck_core::storage`
//! traits, implemented in [`storage`].

pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod output;
pub mod service;
pub mod storage;

pub use config::{Config, ConfigError};
pub use error::{Result, ServiceError};
pub use feed::ChangeFeed;
pub use service::ChecklistService;
