// Tag endpoints.

use tracing::debug;

use crate::client::ApiClient;
use crate::envelope::{ApiResult, PagedList};
use crate::error::Error;
use crate::models::{CreateTag, Tag, TagQuery, UpdateTag};

impl ApiClient {
    /// `GET /api/tags?search=..&page=..&pageSize=..`
    pub async fn list_tags(&self, query: &TagQuery) -> Result<ApiResult<PagedList<Tag>>, Error> {
        self.get_with_params("tags", &query.to_query()).await
    }

    /// `GET /api/tags/{id}`
    pub async fn get_tag(&self, id: u64) -> Result<ApiResult<Tag>, Error> {
        self.get(&format!("tags/{id}")).await
    }

    /// `POST /api/tags`
    pub async fn create_tag(&self, tag: &CreateTag) -> Result<ApiResult<Tag>, Error> {
        debug!(name = %tag.name, "creating tag");
        self.post("tags", tag).await
    }

    /// `PUT /api/tags/{id}`
    pub async fn update_tag(&self, id: u64, update: &UpdateTag) -> Result<ApiResult<Tag>, Error> {
        debug!(id, "updating tag");
        self.put(&format!("tags/{id}"), update).await
    }

    /// `DELETE /api/tags/{id}`
    pub async fn delete_tag(&self, id: u64) -> Result<ApiResult<()>, Error> {
        debug!(id, "deleting tag");
        self.delete(&format!("tags/{id}")).await
    }
}
