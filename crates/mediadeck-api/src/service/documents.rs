// Server document listing endpoint.

use crate::client::ApiClient;
use crate::envelope::ApiResult;
use crate::error::Error;
use crate::models::{DocumentEntry, DocumentQuery};

impl ApiClient {
    /// `GET /api/documents?path=..&includeHidden=..`
    pub async fn list_documents(
        &self,
        query: &DocumentQuery,
    ) -> Result<ApiResult<Vec<DocumentEntry>>, Error> {
        self.get_with_params("documents", &query.to_query()).await
    }
}
