// OMDb ratings endpoint.

use crate::client::{ApiClient, path_segment};
use crate::envelope::ApiResult;
use crate::error::Error;
use crate::models::OmdbDetails;

impl ApiClient {
    /// `GET /api/omdb/{imdb_id}`
    pub async fn omdb_details(&self, imdb_id: &str) -> Result<ApiResult<OmdbDetails>, Error> {
        let path = format!("omdb/{}", path_segment(imdb_id)?);
        self.get(&path).await
    }
}
