use mediadeck_api::models::{
    Indexer, IndexerSearchParams, SearchParams, TorrentResult, YtsDetails, YtsMovie,
};
use mediadeck_api::{ApiClient, PagedList};

use super::{describe, keys};
use crate::cache::QueryKey;
use crate::query::{QueryDescriptor, QueryOptions};

pub fn indexer_providers(client: &ApiClient) -> QueryDescriptor<Vec<Indexer>> {
    describe(
        client,
        QueryKey::new(keys::INDEXER_PROVIDERS),
        QueryOptions::default(),
        (),
        |client, ()| async move { client.indexer_providers().await },
    )
}

/// Disabled while the query is blank.
pub fn indexer_search(
    client: &ApiClient,
    params: IndexerSearchParams,
) -> QueryDescriptor<PagedList<TorrentResult>> {
    describe(
        client,
        QueryKey::with_params(keys::INDEXER_SEARCH, &params),
        QueryOptions::default().enabled(params.is_searchable()),
        params,
        |client, params| async move { client.indexer_search(&params).await },
    )
}

/// Disabled while the query is blank.
pub fn yts_search(client: &ApiClient, params: SearchParams) -> QueryDescriptor<PagedList<YtsMovie>> {
    describe(
        client,
        QueryKey::with_params(keys::YTS_SEARCH, &params),
        QueryOptions::default().enabled(params.is_searchable()),
        params,
        |client, params| async move { client.yts_search(&params).await },
    )
}

pub fn yts_details(client: &ApiClient, id: u64) -> QueryDescriptor<YtsDetails> {
    describe(
        client,
        QueryKey::with_params(keys::YTS_DETAILS, &id),
        QueryOptions::default().enabled(id != 0),
        id,
        |client, id| async move { client.yts_details(id).await },
    )
}
