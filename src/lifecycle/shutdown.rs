//! Stop signalling for the refresh loop.

use tokio::sync::broadcast;

/// Stop signal shared by a registry handle and its refresh loop.
///
/// The loop holds the only receiver and drops it on exit, so
/// `receiver_count` falling to zero means the loop has finished. Dropping the
/// `Shutdown` closes the channel, which the loop treats like `trigger`.
#[derive(Debug)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for a background task to watch.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every watcher. Safe to call any number of times, including after
    /// the watchers are gone.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Watchers that have not exited yet.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
