use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Library-wide counters shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub movie_count: u64,
    #[serde(default)]
    pub tv_show_count: u64,
    #[serde(default)]
    pub episode_count: u64,
    #[serde(default)]
    pub tag_count: u64,
    #[serde(default)]
    pub active_downloads: u32,
    #[serde(default)]
    pub library_size_bytes: u64,
    #[serde(default)]
    pub last_scan: Option<DateTime<Utc>>,
}

/// Host resource usage of the media server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemResources {
    #[serde(default)]
    pub cpu_percent: f64,
    #[serde(default)]
    pub memory_used_bytes: u64,
    #[serde(default)]
    pub memory_total_bytes: u64,
    #[serde(default)]
    pub disk_used_bytes: u64,
    #[serde(default)]
    pub disk_total_bytes: u64,
    #[serde(default)]
    pub uptime_seconds: u64,
    /// 1, 5 and 15 minute load averages, when the host reports them.
    #[serde(default)]
    pub load_average: Vec<f64>,
}

impl SystemResources {
    /// Memory usage as a percentage, `None` when the total is unknown.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn memory_percent(&self) -> Option<f64> {
        (self.memory_total_bytes > 0)
            .then(|| self.memory_used_bytes as f64 / self.memory_total_bytes as f64 * 100.0)
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn disk_percent(&self) -> Option<f64> {
        (self.disk_total_bytes > 0)
            .then(|| self.disk_used_bytes as f64 / self.disk_total_bytes as f64 * 100.0)
    }
}
