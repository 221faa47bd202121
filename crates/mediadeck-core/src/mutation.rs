// ── Mutations ──
//
// Imperative writes (create a tag, upload a file, send a notification).
// A mutation tracks the state of its latest call and never reads or
// writes the query cache; callers invalidate what they changed.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt};
use mediadeck_api::ApiResult;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{FetchOutcome, FetchResult, into_outcome};
use crate::error::QueryError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

/// State of the most recent call of a mutation.
#[derive(Debug)]
pub struct MutationSnapshot<O> {
    pub status: MutationStatus,
    pub data: Option<Arc<O>>,
    pub error: Option<QueryError>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub settled_at: Option<DateTime<Utc>>,
}

impl<O> Clone for MutationSnapshot<O> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            submitted_at: self.submitted_at,
            settled_at: self.settled_at,
        }
    }
}

impl<O> Default for MutationSnapshot<O> {
    fn default() -> Self {
        Self {
            status: MutationStatus::Idle,
            data: None,
            error: None,
            submitted_at: None,
            settled_at: None,
        }
    }
}

impl<O> MutationSnapshot<O> {
    pub fn is_pending(&self) -> bool {
        self.status == MutationStatus::Pending
    }
}

type Runner<I, O> = Arc<dyn Fn(I) -> BoxFuture<'static, FetchResult<O>> + Send + Sync>;

/// A reusable write operation. Cheap to clone; clones share state.
pub struct Mutation<I, O> {
    name: &'static str,
    run: Runner<I, O>,
    state: Arc<watch::Sender<MutationSnapshot<O>>>,
    latest_call: Arc<AtomicU64>,
}

impl<I, O> Clone for Mutation<I, O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            run: Arc::clone(&self.run),
            state: Arc::clone(&self.state),
            latest_call: Arc::clone(&self.latest_call),
        }
    }
}

impl<I, O> fmt::Debug for Mutation<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutation")
            .field("name", &self.name)
            .field("status", &self.state.borrow().status)
            .finish_non_exhaustive()
    }
}

impl<I, O> Mutation<I, O>
where
    I: Send + 'static,
    O: Send + Sync + 'static,
{
    pub fn new<F, Fut>(name: &'static str, run: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ApiResult<O>, mediadeck_api::Error>> + Send + 'static,
    {
        let (state, _) = watch::channel(MutationSnapshot::default());
        Self {
            name,
            run: Arc::new(move |input| run(input).boxed()),
            state: Arc::new(state),
            latest_call: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn snapshot(&self) -> MutationSnapshot<O> {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<MutationSnapshot<O>> {
        self.state.subscribe()
    }

    /// Run the mutation and wait for its outcome.
    ///
    /// When calls overlap, the snapshot reflects the most recent one. If
    /// the returned future is dropped before it settles, the snapshot goes
    /// back to `Idle` instead of staying `Pending`.
    pub async fn mutate(&self, input: I) -> FetchOutcome<O> {
        let call = self.latest_call.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|snap| {
            *snap = MutationSnapshot {
                status: MutationStatus::Pending,
                submitted_at: Some(Utc::now()),
                ..MutationSnapshot::default()
            };
        });
        debug!(mutation = self.name, call, "mutation submitted");

        let guard = CallGuard {
            mutation: self,
            call,
            settled: false,
        };
        let outcome = into_outcome((self.run)(input).await);
        guard.settle(&outcome);
        outcome
    }

    /// Fire and forget. Failures are logged and still land in the snapshot.
    pub fn mutate_detached(&self, input: I) -> JoinHandle<FetchOutcome<O>> {
        let this = self.clone();
        tokio::spawn(async move {
            let outcome = this.mutate(input).await;
            if let Err(error) = &outcome {
                warn!(mutation = this.name, %error, "mutation failed");
            }
            outcome
        })
    }

    /// Back to `Idle`. A call still in flight will not overwrite the reset.
    pub fn reset(&self) {
        self.latest_call.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(MutationSnapshot::default());
    }
}

// ── Call tracking ────────────────────────────────────────────────────

/// Owns the snapshot for one `mutate` call until it settles or is dropped.
struct CallGuard<'a, I, O> {
    mutation: &'a Mutation<I, O>,
    call: u64,
    settled: bool,
}

impl<I, O> CallGuard<'_, I, O> {
    /// Apply `update` only while this call is still the latest one. The
    /// check runs under the watch lock, so a newer call's `Pending` write
    /// is never overwritten.
    fn write_if_latest(&self, update: impl FnOnce(&mut MutationSnapshot<O>)) -> bool {
        let latest = &self.mutation.latest_call;
        self.mutation.state.send_if_modified(|snap| {
            if latest.load(Ordering::SeqCst) != self.call {
                return false;
            }
            update(snap);
            true
        })
    }

    fn settle(mut self, outcome: &FetchOutcome<O>) {
        self.settled = true;
        let written = self.write_if_latest(|snap| {
            snap.settled_at = Some(Utc::now());
            match outcome {
                Ok(data) => {
                    snap.status = MutationStatus::Success;
                    snap.data = Some(Arc::clone(data));
                }
                Err(error) => {
                    snap.status = MutationStatus::Error;
                    snap.error = Some(error.clone());
                }
            }
        });
        if !written {
            debug!(mutation = self.mutation.name, call = self.call, "superseded by a newer call");
        }
    }
}

impl<I, O> Drop for CallGuard<'_, I, O> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if self.write_if_latest(|snap| *snap = MutationSnapshot::default()) {
            debug!(mutation = self.mutation.name, call = self.call, "mutation abandoned before settling");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn echo() -> Mutation<(u64, &'static str), String> {
        Mutation::new("echo", |(delay_ms, text): (u64, &'static str)| async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            if text.is_empty() {
                Ok(ApiResult::failure(["Name is required"]))
            } else {
                Ok(ApiResult::Success(text.to_owned()))
            }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn tracks_success_and_error() {
        let mutation = echo();
        assert_eq!(mutation.snapshot().status, MutationStatus::Idle);

        let created = mutation.mutate((0, "4k")).await.unwrap();
        assert_eq!(created.as_str(), "4k");
        assert_eq!(mutation.snapshot().status, MutationStatus::Success);

        let err = mutation.mutate((0, "")).await.unwrap_err();
        assert_eq!(err.messages(), ["Name is required".to_string()]);
        let snapshot = mutation.snapshot();
        assert_eq!(snapshot.status, MutationStatus::Error);
        assert!(snapshot.data.is_none());

        mutation.reset();
        assert_eq!(mutation.snapshot().status, MutationStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn latest_call_wins() {
        let mutation = echo();
        let slow = mutation.mutate_detached((500, "slow"));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(mutation.snapshot().is_pending());

        mutation.mutate((0, "fast")).await.unwrap();
        assert_eq!(slow.await.unwrap().unwrap().as_str(), "slow");
        assert_eq!(mutation.snapshot().data.as_deref().map(String::as_str), Some("fast"));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_call_does_not_stay_pending() {
        let mutation = echo();

        {
            let call = mutation.mutate((1_000, "never"));
            tokio::pin!(call);
            let waited = tokio::time::timeout(Duration::from_millis(10), &mut call).await;
            assert!(waited.is_err());
            assert!(mutation.snapshot().is_pending());
        }
        let snapshot = mutation.snapshot();
        assert_eq!(snapshot.status, MutationStatus::Idle);
        assert!(snapshot.data.is_none() && snapshot.error.is_none());

        // Dropping a superseded call leaves the newer call's state alone.
        let newer = {
            let older = mutation.mutate((1_000, "older"));
            tokio::pin!(older);
            let _ = tokio::time::timeout(Duration::from_millis(10), &mut older).await;
            let newer = mutation.mutate_detached((500, "newer"));
            tokio::time::sleep(Duration::from_millis(10)).await;
            newer
        };
        assert!(mutation.snapshot().is_pending());
        newer.await.unwrap().unwrap();
        assert_eq!(mutation.snapshot().data.as_deref().map(String::as_str), Some("newer"));
    }
}
