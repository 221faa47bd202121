// mediadeck-api: Async Rust client for the mediadeck media server API

pub mod auth;
pub mod client;
pub mod envelope;
pub mod error;
pub mod models;
pub mod service;
pub mod transport;

pub use auth::{AuthSession, TokenSource};
pub use client::ApiClient;
pub use envelope::{ApiFailure, ApiResult, PagedList, total_pages_for};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
