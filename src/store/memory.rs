//! In-memory reference backend for the remote store boundary.
//!
//! Mirrors the semantics the budget repository relies on from the hosted
//! backend: insertion-ordered collections, whole-record last-writer-wins
//! writes, and push-based subscriptions that re-deliver a full snapshot on
//! every change. Used by the test suite and by embedded/offline callers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedSender};
use uuid::Uuid;

use crate::errors::Result;
use crate::store::remote::{RemoteStore, Subscription, TreeSnapshot};

struct Record {
    /// Insertion sequence; preserved when a record is overwritten so that
    /// "last inserted" ordering is stable across upserts.
    seq: u64,
    value: Value,
}

struct Listener {
    id: u64,
    tx: UnboundedSender<Result<TreeSnapshot>>,
}

pub struct MemoryStore {
    records: Arc<DashMap<String, Record>>,
    listeners: Arc<DashMap<String, Vec<Listener>>>,
    next_seq: AtomicU64,
    next_listener_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            records: Arc::new(DashMap::new()),
            listeners: Arc::new(DashMap::new()),
            next_seq: AtomicU64::new(0),
            next_listener_id: AtomicU64::new(0),
        }
    }

    /// Snapshot of `path`: the record itself if one lives there, plus all
    /// direct children, ordered by insertion.
    fn snapshot(&self, path: &str) -> TreeSnapshot {
        let mut entries: Vec<(u64, String, Value)> = Vec::new();
        for entry in self.records.iter() {
            let key = entry.key();
            if key == path {
                entries.push((entry.seq, leaf_name(key), entry.value.clone()));
            } else if let Some(child) = direct_child_name(path, key) {
                entries.push((entry.seq, child.to_string(), entry.value.clone()));
            }
        }
        entries.sort_by_key(|(seq, _, _)| *seq);
        entries.into_iter().map(|(_, k, v)| (k, v)).collect()
    }

    /// Push a fresh snapshot to every listener watching `changed_path` or
    /// its parent collection. Dead listeners are pruned on the way.
    fn notify(&self, changed_path: &str) {
        let mut watched = vec![changed_path.to_string()];
        if let Some(idx) = changed_path.rfind('/') {
            watched.push(changed_path[..idx].to_string());
        }
        for path in watched {
            if let Some(mut listeners) = self.listeners.get_mut(&path) {
                let snapshot = self.snapshot(&path);
                listeners.retain(|l| l.tx.send(Ok(snapshot.clone())).is_ok());
            }
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn push_id(&self, _path: &str) -> Result<String> {
        Ok(Uuid::new_v4().to_string())
    }

    async fn set(&self, path: &str, value: Value) -> Result<()> {
        match self.records.get_mut(path) {
            Some(mut record) => record.value = value,
            None => {
                let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
                self.records.insert(path.to_string(), Record { seq, value });
            }
        }
        self.notify(path);
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Option<Value>> {
        Ok(self.records.get(path).map(|r| r.value.clone()))
    }

    async fn remove(&self, path: &str) -> Result<()> {
        if self.records.remove(path).is_some() {
            self.notify(path);
        }
        Ok(())
    }

    async fn last_inserted(&self, path: &str, count: usize) -> Result<TreeSnapshot> {
        let mut snapshot = self.snapshot(path);
        let skip = snapshot.len().saturating_sub(count);
        Ok(snapshot.split_off(skip))
    }

    fn subscribe(&self, path: &str) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        // Initial state first, so a fresh subscription always observes the
        // current tree before any update.
        let _ = tx.send(Ok(self.snapshot(path)));

        let id = self.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.listeners
            .entry(path.to_string())
            .or_default()
            .push(Listener { id, tx });

        let guard = ListenerGuard {
            listeners: Arc::clone(&self.listeners),
            path: path.to_string(),
            id,
        };
        Subscription::new(rx, guard)
    }
}

/// Detaches one listener from the registry when the subscription is dropped.
struct ListenerGuard {
    listeners: Arc<DashMap<String, Vec<Listener>>>,
    path: String,
    id: u64,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(mut listeners) = self.listeners.get_mut(&self.path) {
            listeners.retain(|l| l.id != self.id);
        }
    }
}

fn leaf_name(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

/// `Some(child)` when `key` is exactly one level below `parent`.
fn direct_child_name<'a>(parent: &str, key: &'a str) -> Option<&'a str> {
    let rest = key.strip_prefix(parent)?.strip_prefix('/')?;
    if rest.is_empty() || rest.contains('/') {
        None
    } else {
        Some(rest)
    }
}
