// mediadeck-core: Query cache and hooks between mediadeck-api and consumers (CLI).
//
// A `Query<T>` mounts an observer on a shared, keyed cache entry: it
// fetches when stale, coalesces concurrent fetches of the same key,
// polls on its own schedule, and unmounts on drop. `Mutation<I, O>`
// wraps writes. `MediaDeck` ties the client, session and cache together.

pub mod cache;
pub mod config;
pub mod deck;
pub mod error;
pub mod hooks;
pub mod mutation;
pub mod query;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{FetchOutcome, QueryCache, QueryKey, QuerySnapshot, QueryStatus};
pub use config::{CacheConfig, ClientConfig, TlsVerification};
pub use deck::MediaDeck;
pub use error::{CoreError, QueryError};
pub use mutation::{Mutation, MutationSnapshot, MutationStatus};
pub use query::{Query, QueryDescriptor, QueryOptions, Subscription};
pub use stream::{QueryStream, QueryWatchStream};

// Domain records and envelopes pass through unchanged.
pub use mediadeck_api::models;
pub use mediadeck_api::{ApiFailure, ApiResult, AuthSession, PagedList};
