// Domain records returned by the media server.
//
// Plain value types: produced by the server, never mutated locally, replaced
// wholesale on every successful fetch. Fields use `#[serde(default)]` freely
// because optional sub-resources are omitted by the server when not requested.

pub mod dashboard;
pub mod library;
pub mod media;
pub mod torrents;

pub use dashboard::{DashboardStats, SystemResources};
pub use library::{
    CreateTag, DocumentEntry, DocumentKind, DocumentQuery, LogEntry, LogLevel, LogQuery, ParseMode,
    Tag, TagQuery, TaskState, TaskStatus, TelegramMessage, UpdateTag, UploadRequest, UploadResult,
};
pub use media::{
    CastMember, Credits, CrewMember, EpisodeGroup, ExternalIds, Genre, GetMediaDetailsParams,
    Image, MediaImages, MediaKind, MediaSummary, Movie, OmdbDetails, OmdbRating, SearchParams,
    Season, TvShow,
};
pub use torrents::{Indexer, IndexerSearchParams, TorrentResult, YtsDetails, YtsMovie, YtsTorrent};

/// Default page size used by list endpoints when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Query pairs for `page` / `pageSize`.
pub(crate) fn paging_params(page: u32, page_size: u32) -> [(&'static str, String); 2] {
    [
        ("page", page.max(1).to_string()),
        ("pageSize", page_size.to_string()),
    ]
}
