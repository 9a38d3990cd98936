//! Change notifications for live queries.
//!
//! Every successful write through the service publishes a [`StoreChange`].
//! Watch streams subscribe here and re-read the store when a change concerns
//! them.

use tokio::sync::broadcast;

use carcheck_core::checklist::StoreChange;

/// Default channel capacity for change notifications.
pub const DEFAULT_CAPACITY: usize = 64;

/// Broadcast channel of store changes.
///
/// Sending never blocks. A subscriber that falls more than `capacity`
/// notifications behind gets `RecvError::Lagged` and should re-query.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<StoreChange>,
}

impl ChangeFeed {
    /// Creates a feed whose subscribers buffer up to `capacity` changes.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes a change to every current subscriber.
    pub fn publish(&self, change: StoreChange) {
        // No receivers just means nobody is watching right now.
        let receivers = self.sender.send(change).unwrap_or(0);
        tracing::trace!(?change, receivers, "Published store change");
    }

    /// Subscribes to changes published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.sender.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
