//! View subscriptions.
//!
//! A view owns a `Subscription`. Every fetch task it starts gets a `Watcher`
//! cloned from it and reports status changes through `Watcher::notify`. When
//! the view is torn down the subscription is detached (explicitly or on
//! drop) and any late result is discarded instead of reaching stale state.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::trace;

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

pub struct Subscription {
    token: u64,
    attached: Arc<AtomicBool>,
}

impl Subscription {
    pub fn new() -> Self {
        Self {
            token: NEXT_TOKEN.fetch_add(1, Ordering::Relaxed),
            attached: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Unique per subscription; messages carry it so the receiver can check
    /// which view they belong to.
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn watcher<M>(&self, tx: mpsc::Sender<M>) -> Watcher<M> {
        Watcher {
            token: self.token,
            attached: Arc::clone(&self.attached),
            tx,
        }
    }

    pub fn detach(&self) {
        if self.attached.swap(false, Ordering::AcqRel) {
            trace!(token = self.token, "subscription detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

pub struct Watcher<M> {
    token: u64,
    attached: Arc<AtomicBool>,
    tx: mpsc::Sender<M>,
}

impl<M> Clone for Watcher<M> {
    fn clone(&self) -> Self {
        Self {
            token: self.token,
            attached: Arc::clone(&self.attached),
            tx: self.tx.clone(),
        }
    }
}

impl<M> Watcher<M> {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    /// Deliver `msg` if the owning view is still attached. Returns whether it
    /// was delivered.
    pub async fn notify(&self, msg: M) -> bool {
        if !self.is_attached() {
            trace!(token = self.token, "dropping result for detached view");
            return false;
        }
        self.tx.send(msg).await.is_ok()
    }
}
