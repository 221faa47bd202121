// Server log endpoint.

use crate::client::ApiClient;
use crate::envelope::{ApiResult, PagedList};
use crate::error::Error;
use crate::models::{LogEntry, LogQuery};

impl ApiClient {
    /// `GET /api/logs?level=..&source=..&search=..&since=..&page=..&pageSize=..`
    pub async fn list_logs(&self, query: &LogQuery) -> Result<ApiResult<PagedList<LogEntry>>, Error> {
        self.get_with_params("logs", &query.to_query()).await
    }
}
