// ── Reactive query streams ──
//
// Subscription type for consuming snapshot changes of one query.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::stream::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::cache::QuerySnapshot;

/// A subscription to one query's snapshots.
///
/// Provides both point-in-time access and change notification via
/// [`changed()`](Self::changed) or by converting to a `Stream`.
pub struct QueryStream<T: Send + Sync + 'static> {
    current: QuerySnapshot<T>,
    receiver: watch::Receiver<QuerySnapshot<T>>,
}

impl<T: Send + Sync + 'static> QueryStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<QuerySnapshot<T>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation or at the last `changed()`.
    pub fn current(&self) -> &QuerySnapshot<T> {
        &self.current
    }

    /// The latest snapshot, which may be newer than `current()`.
    pub fn latest(&self) -> QuerySnapshot<T> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. Returns `None` once the query is dropped.
    pub async fn changed(&mut self) -> Option<QuerySnapshot<T>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    pub fn into_stream(self) -> QueryWatchStream<T> {
        QueryWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding every new snapshot, starting with the
/// current one.
pub struct QueryWatchStream<T: Send + Sync + 'static> {
    inner: WatchStream<QuerySnapshot<T>>,
}

impl<T: Send + Sync + 'static> Stream for QueryWatchStream<T> {
    type Item = QuerySnapshot<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
