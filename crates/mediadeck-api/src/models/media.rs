// Media catalog records (TMDB search/details, OMDb ratings).

use serde::{Deserialize, Serialize};

use super::DEFAULT_PAGE_SIZE;

// ── Request parameters ──────────────────────────────────────────────

/// Free-text search with paging, shared by catalog and scraper searches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: String,
    pub page: u32,
    pub page_size: u32,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// A blank query never reaches the server.
    pub fn is_searchable(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("query", self.query.trim().to_owned())];
        params.extend(super::paging_params(self.page, self.page_size));
        params
    }
}

/// Which optional sub-resources to embed in a details response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMediaDetailsParams {
    pub external_ids: bool,
    pub images: bool,
    pub credits: bool,
    pub episode_groups: bool,
    pub similar: bool,
}

impl GetMediaDetailsParams {
    /// Every sub-resource.
    pub fn all() -> Self {
        Self {
            external_ids: true,
            images: true,
            credits: true,
            episode_groups: true,
            similar: true,
        }
    }

    /// Comma list for the `append_to_response` query parameter.
    pub fn append_to_response(&self) -> Option<String> {
        let parts: Vec<&str> = [
            (self.external_ids, "external_ids"),
            (self.images, "images"),
            (self.credits, "credits"),
            (self.episode_groups, "episode_groups"),
            (self.similar, "similar"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect();

        (!parts.is_empty()).then(|| parts.join(","))
    }

    pub(crate) fn to_query(self) -> Vec<(&'static str, String)> {
        self.append_to_response()
            .map(|list| vec![("append_to_response", list)])
            .unwrap_or_default()
    }
}

// ── Search results ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

/// One row of a movie or TV search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSummary {
    pub id: u64,
    pub title: String,
    pub kind: MediaKind,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl MediaSummary {
    pub fn year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(|d| d.get(..4))
    }
}

// ── Details ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIds {
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub tvdb_id: Option<u64>,
    #[serde(default)]
    pub wikidata_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub file_path: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaImages {
    #[serde(default)]
    pub posters: Vec<Image>,
    #[serde(default)]
    pub backdrops: Vec<Image>,
    #[serde(default)]
    pub logos: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub group_count: u32,
    #[serde(default)]
    pub episode_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub season_number: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub episode_count: u32,
    #[serde(default)]
    pub air_date: Option<String>,
}

/// Full movie record. Sub-resources are present only when requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub external_ids: Option<ExternalIds>,
    #[serde(default)]
    pub images: Option<MediaImages>,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub similar: Option<Vec<MediaSummary>>,
}

/// Full TV show record. Sub-resources are present only when requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TvShow {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub number_of_seasons: u32,
    #[serde(default)]
    pub number_of_episodes: u32,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub external_ids: Option<ExternalIds>,
    #[serde(default)]
    pub images: Option<MediaImages>,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub episode_groups: Option<Vec<EpisodeGroup>>,
    #[serde(default)]
    pub similar: Option<Vec<MediaSummary>>,
}

// ── OMDb ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OmdbRating {
    pub source: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OmdbDetails {
    pub imdb_id: String,
    pub title: String,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub rated: Option<String>,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub imdb_rating: Option<String>,
    #[serde(default)]
    pub ratings: Vec<OmdbRating>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_to_response_lists_selected_flags() {
        assert_eq!(GetMediaDetailsParams::default().append_to_response(), None);

        let params = GetMediaDetailsParams {
            credits: true,
            similar: true,
            ..GetMediaDetailsParams::default()
        };
        assert_eq!(params.append_to_response().as_deref(), Some("credits,similar"));
        assert_eq!(
            GetMediaDetailsParams::all().append_to_response().as_deref(),
            Some("external_ids,images,credits,episode_groups,similar")
        );
    }

    #[test]
    fn blank_query_is_not_searchable() {
        assert!(!SearchParams::new("   ").is_searchable());
        assert!(SearchParams::new("dune").is_searchable());
    }
}
