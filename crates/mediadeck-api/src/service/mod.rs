// Remote service modules
//
// One file per server area. Each adds inherent methods to `ApiClient` that
// perform exactly one request and return the full `ApiResult` envelope.
// No retries, no caching: transport errors propagate unchanged.

pub mod dashboard;
pub mod documents;
pub mod indexer;
pub mod logs;
pub mod omdb;
pub mod scrapers;
pub mod tags;
pub mod tasks;
pub mod telegram;
pub mod tmdb;
pub mod uploads;
