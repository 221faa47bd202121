use mediadeck_api::ApiClient;
use mediadeck_api::models::{DashboardStats, SystemResources};

use super::{DASHBOARD_POLL_INTERVAL, SYSTEM_RESOURCES_POLL_INTERVAL, describe, keys};
use crate::cache::QueryKey;
use crate::query::{QueryDescriptor, QueryOptions};

/// Library counters, polled every 20 s while observed.
pub fn dashboard_stats(client: &ApiClient) -> QueryDescriptor<DashboardStats> {
    describe(
        client,
        QueryKey::new(keys::DASHBOARD_STATS),
        QueryOptions::default().poll_every(DASHBOARD_POLL_INTERVAL),
        (),
        |client, ()| async move { client.dashboard_stats().await },
    )
}

/// Host CPU, memory and disk usage, polled every 30 s while observed.
pub fn system_resources(client: &ApiClient) -> QueryDescriptor<SystemResources> {
    describe(
        client,
        QueryKey::new(keys::SYSTEM_RESOURCES),
        QueryOptions::default().poll_every(SYSTEM_RESOURCES_POLL_INTERVAL),
        (),
        |client, ()| async move { client.system_resources().await },
    )
}
