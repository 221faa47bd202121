// Torrent indexers and scraper records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DEFAULT_PAGE_SIZE;

/// A configured torrent indexer provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indexer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub last_error: Option<String>,
}

/// Search across one or all indexers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexerSearchParams {
    pub query: String,
    /// Restrict to one provider; `None` searches all enabled providers.
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl IndexerSearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            provider: None,
            category: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn is_searchable(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("query", self.query.trim().to_owned())];
        if let Some(provider) = &self.provider {
            params.push(("provider", provider.clone()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        params.extend(super::paging_params(self.page, self.page_size));
        params
    }
}

/// One torrent returned by an indexer search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TorrentResult {
    pub title: String,
    pub indexer: String,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub seeders: u32,
    #[serde(default)]
    pub leechers: u32,
    #[serde(default)]
    pub magnet_uri: Option<String>,
    #[serde(default)]
    pub info_hash: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

// ── YTS scraper ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YtsTorrent {
    pub quality: String,
    #[serde(default, rename = "type")]
    pub release_type: Option<String>,
    pub hash: String,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub seeds: u32,
    #[serde(default)]
    pub peers: u32,
}

/// Search row from the YTS scraper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YtsMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub imdb_code: Option<String>,
}

/// Full scraper record for one YTS movie, with its torrents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YtsDetails {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub imdb_code: Option<String>,
    #[serde(default)]
    pub torrents: Vec<YtsTorrent>,
}

impl YtsDetails {
    /// Torrent with the most seeds, if any.
    pub fn best_torrent(&self) -> Option<&YtsTorrent> {
        self.torrents.iter().max_by_key(|t| t.seeds)
    }
}
