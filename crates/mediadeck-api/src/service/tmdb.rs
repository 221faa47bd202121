// Media catalog (TMDB proxy) endpoints.
//
// The server proxies TMDB and normalizes responses into the standard
// envelope; details endpoints embed sub-resources selected through
// `append_to_response`.

use tracing::debug;

use crate::client::ApiClient;
use crate::envelope::{ApiResult, PagedList};
use crate::error::Error;
use crate::models::{GetMediaDetailsParams, MediaSummary, Movie, SearchParams, TvShow};

impl ApiClient {
    /// `GET /api/tmdb/search/movie?query=..`
    pub async fn search_movies(
        &self,
        params: &SearchParams,
    ) -> Result<ApiResult<PagedList<MediaSummary>>, Error> {
        debug!(query = %params.query, page = params.page, "searching movies");
        self.get_with_params("tmdb/search/movie", &params.to_query())
            .await
    }

    /// `GET /api/tmdb/search/tv?query=..`
    pub async fn search_tv(
        &self,
        params: &SearchParams,
    ) -> Result<ApiResult<PagedList<MediaSummary>>, Error> {
        debug!(query = %params.query, page = params.page, "searching tv shows");
        self.get_with_params("tmdb/search/tv", &params.to_query())
            .await
    }

    /// `GET /api/tmdb/movie/{id}?append_to_response=..`
    pub async fn movie_details(
        &self,
        id: u64,
        params: GetMediaDetailsParams,
    ) -> Result<ApiResult<Movie>, Error> {
        self.get_with_params(&format!("tmdb/movie/{id}"), &params.to_query())
            .await
    }

    /// `GET /api/tmdb/tv/{id}?append_to_response=..`
    pub async fn tv_details(
        &self,
        id: u64,
        params: GetMediaDetailsParams,
    ) -> Result<ApiResult<TvShow>, Error> {
        self.get_with_params(&format!("tmdb/tv/{id}"), &params.to_query())
            .await
    }
}
