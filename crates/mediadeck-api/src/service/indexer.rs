// Torrent indexer endpoints.

use tracing::debug;

use crate::client::ApiClient;
use crate::envelope::{ApiResult, PagedList};
use crate::error::Error;
use crate::models::{Indexer, IndexerSearchParams, TorrentResult};

impl ApiClient {
    /// List configured indexer providers.
    ///
    /// `GET /api/indexer/providers`
    pub async fn indexer_providers(&self) -> Result<ApiResult<Vec<Indexer>>, Error> {
        self.get("indexer/providers").await
    }

    /// Search indexers for torrents.
    ///
    /// `GET /api/indexer/search?query=..&provider=..&page=..&pageSize=..`
    pub async fn indexer_search(
        &self,
        params: &IndexerSearchParams,
    ) -> Result<ApiResult<PagedList<TorrentResult>>, Error> {
        debug!(query = %params.query, provider = ?params.provider, "searching indexers");
        self.get_with_params("indexer/search", &params.to_query())
            .await
    }
}
