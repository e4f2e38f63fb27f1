//! Remote store boundary.
//!
//! The GlowGirls backend is a tree-shaped key-value store scoped per user
//! (`users/{userId}/budgets/{budgetId}`, `users/{userId}/expenses/{expenseId}`).
//! This trait captures the operations the budget repository needs from it:
//! id minting, whole-record reads/writes/removes, an insertion-ordered
//! "last n" query, and push-based subscriptions on a subtree.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::errors::Result;

/// One level of a subtree at a point in time: `(child key, record value)`
/// pairs in insertion order. A subscription re-delivers the full snapshot on
/// every change rather than a delta.
pub type TreeSnapshot = Vec<(String, Value)>;

#[async_trait]
pub trait RemoteStore: Send + Sync + 'static {
    /// Mint a new unique child id under `path` without writing anything.
    async fn push_id(&self, path: &str) -> Result<String>;

    /// Write the record at `path` wholesale. Last writer wins; there is no
    /// partial-field merge.
    async fn set(&self, path: &str, value: Value) -> Result<()>;

    /// Read the record at `path`, or `None` if absent.
    async fn get(&self, path: &str) -> Result<Option<Value>>;

    /// Remove the record at `path`. Removing an absent record is not an error.
    async fn remove(&self, path: &str) -> Result<()>;

    /// The last `count` children of `path` in insertion order. Re-writing an
    /// existing record keeps its original insertion position.
    async fn last_inserted(&self, path: &str, count: usize) -> Result<TreeSnapshot>;

    /// Register a listener on `path`. The subscription receives the current
    /// snapshot immediately, then a fresh snapshot after every change under
    /// `path`, until it is dropped.
    fn subscribe(&self, path: &str) -> Subscription;
}

/// A live listener on a subtree.
///
/// Holds the receiving half of the snapshot channel plus a guard object
/// whose `Drop` releases the remote listener exactly once. The stream ends
/// (`next()` returns `None`) when the store goes away; it yields at most one
/// `Err` before the store stops feeding it, and consumers are expected to
/// resubscribe after either.
pub struct Subscription {
    rx: UnboundedReceiver<Result<TreeSnapshot>>,
    _listener: Box<dyn Send>,
}

impl Subscription {
    pub fn new(rx: UnboundedReceiver<Result<TreeSnapshot>>, listener: impl Send + 'static) -> Self {
        Subscription {
            rx,
            _listener: Box::new(listener),
        }
    }

    /// Wait for the next snapshot. `None` means the subscription is finished.
    pub async fn next(&mut self) -> Option<Result<TreeSnapshot>> {
        self.rx.recv().await
    }
}
