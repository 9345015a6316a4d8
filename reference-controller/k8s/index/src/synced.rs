use ahash::AHashSet as HashSet;
use reference_controller_core::Kind;
use tokio::{sync::watch, time};
use tracing::{debug, info};

/// Observes whether the index has completed the initial listing of every kind.
#[derive(Clone, Debug)]
pub struct Synced(watch::Receiver<bool>);

/// Tracks the kinds that have not yet completed their initial listing.
#[derive(Debug)]
pub(crate) struct Pending {
    kinds: HashSet<Kind>,
    tx: watch::Sender<bool>,
}

// === impl Synced ===

impl Synced {
    pub fn is_synced(&self) -> bool {
        *self.0.borrow()
    }

    /// Waits for the index to sync.
    ///
    /// Returns false if the index is dropped before syncing.
    pub async fn synced(&self) -> bool {
        let mut rx = self.0.clone();
        let ok = rx.wait_for(|synced| *synced).await.is_ok();
        ok
    }

    /// Waits for the index to sync, giving up after `timeout`.
    pub async fn wait(&self, timeout: time::Duration) -> bool {
        if self.is_synced() {
            return true;
        }
        time::timeout(timeout, self.synced()).await.unwrap_or(false)
    }
}

// === impl Pending ===

impl Pending {
    pub(crate) fn new(kinds: impl IntoIterator<Item = Kind>) -> (Self, Synced) {
        let kinds = kinds.into_iter().collect::<HashSet<_>>();
        let (tx, rx) = watch::channel(kinds.is_empty());
        (Self { kinds, tx }, Synced(rx))
    }

    /// Records that `kind` has completed its initial listing.
    pub(crate) fn complete(&mut self, kind: Kind) {
        if !self.kinds.remove(&kind) {
            return;
        }

        debug!(%kind, remaining = self.kinds.len(), "Initial listing indexed");
        if self.kinds.is_empty() {
            info!("Index synced");
            self.tx.send_replace(true);
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.kinds.is_empty()
    }
}
