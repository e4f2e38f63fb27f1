//! Typed live-query handles layered on top of raw [`Subscription`]s.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::errors::Result;
use crate::store::remote::{Subscription, TreeSnapshot};

/// A live query: a typed view over a store subscription.
///
/// Each handle owns the task that decodes raw snapshots into `T`. Dropping
/// the handle aborts that task, which drops the underlying [`Subscription`]
/// and releases the remote listener exactly once. After an `Err` item the
/// query stops emitting; consumers resubscribe or surface the failure.
pub struct LiveQuery<T> {
    rx: UnboundedReceiver<Result<T>>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> LiveQuery<T> {
    /// Decode every snapshot from `subscription` through `decode`.
    pub fn from_subscription<F>(mut subscription: Subscription, mut decode: F) -> Self
    where
        F: FnMut(TreeSnapshot) -> Result<T> + Send + 'static,
    {
        Self::spawn(move |tx| async move {
            while let Some(event) = subscription.next().await {
                let item = event.and_then(&mut decode);
                let failed = item.is_err();
                if tx.send(item).is_err() || failed {
                    break;
                }
            }
        })
    }

    /// Build a live query from an arbitrary driver future. The driver gets
    /// the sending half of the channel and runs until it returns or the
    /// handle is dropped.
    pub fn spawn<F, Fut>(driver: F) -> Self
    where
        F: FnOnce(UnboundedSender<Result<T>>) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(driver(tx));
        LiveQuery { rx, task }
    }

    /// Transform every emitted value, keeping the cancellation chain intact.
    pub fn map<U, F>(mut self, mut f: F) -> LiveQuery<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        LiveQuery::spawn(move |tx| async move {
            while let Some(item) = self.next().await {
                let item = item.map(&mut f);
                let failed = item.is_err();
                if tx.send(item).is_err() || failed {
                    break;
                }
            }
        })
    }

    /// Wait for the next emission. `None` means the query has terminated.
    pub async fn next(&mut self) -> Option<Result<T>> {
        self.rx.recv().await
    }
}

impl<T> Drop for LiveQuery<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl<T> Stream for LiveQuery<T> {
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
