// Dashboard endpoints: library counters and host resources.

use tracing::debug;

use crate::client::ApiClient;
use crate::envelope::ApiResult;
use crate::error::Error;
use crate::models::{DashboardStats, SystemResources};

impl ApiClient {
    /// `GET /api/dashboard/stats`
    pub async fn dashboard_stats(&self) -> Result<ApiResult<DashboardStats>, Error> {
        debug!("fetching dashboard stats");
        self.get("dashboard/stats").await
    }

    /// `GET /api/dashboard/system-resources`
    pub async fn system_resources(&self) -> Result<ApiResult<SystemResources>, Error> {
        debug!("fetching system resources");
        self.get("dashboard/system-resources").await
    }
}
