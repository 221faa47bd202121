use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::QueryError;

/// Lifecycle of a cached query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum QueryStatus {
    /// Never fetched (or disabled before the first fetch).
    #[default]
    Idle,
    /// First fetch in flight, no data yet.
    Loading,
    Success,
    Error,
}

/// Point-in-time view of one cache entry.
///
/// `data` survives a failed refetch: a poll that errors keeps showing the
/// last good value alongside the new `error`.
#[derive(Debug)]
pub struct QuerySnapshot<T> {
    pub status: QueryStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<QueryError>,
    /// A fetch for this key is in flight.
    pub is_fetching: bool,
    pub data_updated_at: Option<DateTime<Utc>>,
    pub error_updated_at: Option<DateTime<Utc>>,
    /// Number of successful fetches written to the entry.
    pub data_update_count: u64,
    /// Consecutive failures since the last success.
    pub failure_count: u32,
}

// Manual impls: `Arc<T>` is cloneable for any `T`.
impl<T> Clone for QuerySnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_fetching: self.is_fetching,
            data_updated_at: self.data_updated_at,
            error_updated_at: self.error_updated_at,
            data_update_count: self.data_update_count,
            failure_count: self.failure_count,
        }
    }
}

impl<T> Default for QuerySnapshot<T> {
    fn default() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_fetching: false,
            data_updated_at: None,
            error_updated_at: None,
            data_update_count: 0,
            failure_count: 0,
        }
    }
}

impl<T> QuerySnapshot<T> {
    pub fn is_idle(&self) -> bool {
        self.status == QueryStatus::Idle
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_deref()
    }

    // ── Transitions ──────────────────────────────────────────────────

    pub(crate) fn begin_fetch(&mut self) {
        self.is_fetching = true;
        if self.status == QueryStatus::Idle {
            self.status = QueryStatus::Loading;
        }
    }

    pub(crate) fn resolve(&mut self, data: Arc<T>) {
        self.status = QueryStatus::Success;
        self.data = Some(data);
        self.error = None;
        self.is_fetching = false;
        self.data_updated_at = Some(Utc::now());
        self.data_update_count += 1;
        self.failure_count = 0;
    }

    pub(crate) fn reject(&mut self, error: QueryError) {
        self.status = QueryStatus::Error;
        self.error = Some(error);
        self.is_fetching = false;
        self.error_updated_at = Some(Utc::now());
        self.failure_count = self.failure_count.saturating_add(1);
    }

    /// The fetch finished after every observer left; nothing is written.
    pub(crate) fn abandon(&mut self) {
        self.is_fetching = false;
        if self.status == QueryStatus::Loading {
            self.status = QueryStatus::Idle;
        }
    }
}
