use std::sync::Arc;

use tokio::sync::watch;

use super::Observer;

/// A broadcast of "something changed" that any number of subscribers can wait on.
///
/// The payload is just a counter of the successful loads seen so far, subscribers are expected
/// to re-read whatever they care about from the cache.
#[derive(Clone)]
pub struct ChangeFeed {
    sender: Arc<watch::Sender<u64>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);

        ChangeFeed {
            sender: Arc::new(sender),
        }
    }

    /// Returns a receiver whose `changed` resolves after the next successful load
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.sender.subscribe()
    }

    /// How many successful loads this feed has seen
    pub fn version(&self) -> u64 {
        *self.sender.borrow()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ChangeFeed {
    fn notify(&self) {
        // send_modify updates the value even when nobody is subscribed yet
        self.sender.send_modify(|version| *version += 1);
    }
}
