// Background task endpoints.

use crate::client::{ApiClient, path_segment};
use crate::envelope::ApiResult;
use crate::error::Error;
use crate::models::TaskStatus;

impl ApiClient {
    /// `GET /api/tasks`
    pub async fn list_tasks(&self) -> Result<ApiResult<Vec<TaskStatus>>, Error> {
        self.get("tasks").await
    }

    /// `GET /api/tasks/{id}`
    pub async fn task_status(&self, task_id: &str) -> Result<ApiResult<TaskStatus>, Error> {
        let path = format!("tasks/{}", path_segment(task_id)?);
        self.get(&path).await
    }
}
