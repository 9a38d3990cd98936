mod error;
mod messages;
mod traits;

pub use error::{RepositoryError, Result};
pub use messages::repository_error_message;
pub use traits::{ChecklistRepository, ChecklistStore, ItemRepository};
