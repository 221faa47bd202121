// Scraper endpoints (YTS).

use tracing::debug;

use crate::client::ApiClient;
use crate::envelope::{ApiResult, PagedList};
use crate::error::Error;
use crate::models::{SearchParams, YtsDetails, YtsMovie};

impl ApiClient {
    /// `GET /api/scrapers/yts/search?query=..`
    pub async fn yts_search(
        &self,
        params: &SearchParams,
    ) -> Result<ApiResult<PagedList<YtsMovie>>, Error> {
        debug!(query = %params.query, "searching yts");
        self.get_with_params("scrapers/yts/search", &params.to_query())
            .await
    }

    /// `GET /api/scrapers/yts/{id}`
    pub async fn yts_details(&self, id: u64) -> Result<ApiResult<YtsDetails>, Error> {
        self.get(&format!("scrapers/yts/{id}")).await
    }
}
