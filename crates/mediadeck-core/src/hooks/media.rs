// Catalog lookups. Searches are keyed by the full `SearchParams`, so
// every page and query string gets its own entry.

use mediadeck_api::models::{GetMediaDetailsParams, MediaSummary, Movie, OmdbDetails, SearchParams, TvShow};
use mediadeck_api::{ApiClient, PagedList};

use super::{describe, keys};
use crate::cache::QueryKey;
use crate::query::{QueryDescriptor, QueryOptions};

pub fn search_movies(
    client: &ApiClient,
    params: SearchParams,
) -> QueryDescriptor<PagedList<MediaSummary>> {
    describe(
        client,
        QueryKey::with_params(keys::SEARCH_MOVIES, &params),
        QueryOptions::default().enabled(params.is_searchable()),
        params,
        |client, params| async move { client.search_movies(&params).await },
    )
}

pub fn search_tv(client: &ApiClient, params: SearchParams) -> QueryDescriptor<PagedList<MediaSummary>> {
    describe(
        client,
        QueryKey::with_params(keys::SEARCH_TV, &params),
        QueryOptions::default().enabled(params.is_searchable()),
        params,
        |client, params| async move { client.search_tv(&params).await },
    )
}

/// Keyed by id and the requested sub-resources.
pub fn movie_details(
    client: &ApiClient,
    id: u64,
    params: GetMediaDetailsParams,
) -> QueryDescriptor<Movie> {
    describe(
        client,
        QueryKey::with_params(keys::MOVIE_DETAILS, &(id, params)),
        QueryOptions::default().enabled(id != 0),
        (id, params),
        |client, (id, params)| async move { client.movie_details(id, params).await },
    )
}

pub fn tv_details(client: &ApiClient, id: u64, params: GetMediaDetailsParams) -> QueryDescriptor<TvShow> {
    describe(
        client,
        QueryKey::with_params(keys::TV_DETAILS, &(id, params)),
        QueryOptions::default().enabled(id != 0),
        (id, params),
        |client, (id, params)| async move { client.tv_details(id, params).await },
    )
}

pub fn omdb_details(client: &ApiClient, imdb_id: &str) -> QueryDescriptor<OmdbDetails> {
    let imdb_id = imdb_id.trim().to_owned();
    describe(
        client,
        QueryKey::with_params(keys::OMDB_DETAILS, &imdb_id),
        QueryOptions::default().enabled(!imdb_id.is_empty()),
        imdb_id,
        |client, imdb_id| async move { client.omdb_details(&imdb_id).await },
    )
}
