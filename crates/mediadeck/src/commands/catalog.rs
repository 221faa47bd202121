//! Catalog search and detail handlers.

use tabled::Tabled;

use mediadeck_core::MediaDeck;
use mediadeck_core::models::{
    Credits, ExternalIds, GetMediaDetailsParams, MediaSummary, Movie, OmdbDetails, SearchParams,
    TvShow,
};

use crate::cli::{DetailArgs, GlobalOpts, OutputFormat, SearchArgs, SearchCommand};
use crate::error::{self, CliError};
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Year")]
    year: String,
    #[tabled(rename = "Rating")]
    rating: String,
}

impl From<&MediaSummary> for SummaryRow {
    fn from(m: &MediaSummary) -> Self {
        Self {
            id: m.id,
            title: m.title.clone(),
            year: m.year().unwrap_or("-").to_owned(),
            rating: m
                .vote_average
                .map_or_else(|| "-".into(), |v| format!("{v:.1}")),
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

fn details_params(args: &DetailArgs) -> GetMediaDetailsParams {
    if args.all {
        return GetMediaDetailsParams::all();
    }
    GetMediaDetailsParams {
        external_ids: args.external_ids,
        images: args.images,
        credits: args.credits,
        episode_groups: args.episode_groups,
        similar: args.similar,
    }
}

fn genres(names: impl Iterator<Item = String>) -> String {
    let joined = names.collect::<Vec<_>>().join(", ");
    if joined.is_empty() { "-".into() } else { joined }
}

fn extras(
    pairs: &mut Vec<(&'static str, String)>,
    external_ids: Option<&ExternalIds>,
    credits: Option<&Credits>,
    similar: Option<&Vec<MediaSummary>>,
) {
    if let Some(ids) = external_ids {
        pairs.push(("IMDb", output::opt(ids.imdb_id.as_ref())));
        pairs.push(("TVDB", output::opt(ids.tvdb_id.as_ref())));
    }
    if let Some(credits) = credits {
        let cast = credits
            .cast
            .iter()
            .take(5)
            .map(|c| match c.character {
                Some(ref role) => format!("{} ({role})", c.name),
                None => c.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        pairs.push(("Cast", cast));
        let directors = credits
            .crew
            .iter()
            .filter(|c| c.job.as_deref() == Some("Director"))
            .map(|c| c.name.clone())
            .collect::<Vec<_>>()
            .join(", ");
        if !directors.is_empty() {
            pairs.push(("Director", directors));
        }
    }
    if let Some(similar) = similar {
        let titles = similar
            .iter()
            .take(5)
            .map(|m| m.title.clone())
            .collect::<Vec<_>>()
            .join(", ");
        pairs.push(("Similar", titles));
    }
}

fn movie_detail(m: &Movie) -> String {
    let mut pairs = vec![
        ("ID", m.id.to_string()),
        ("Title", m.title.clone()),
        ("Released", output::opt(m.release_date.as_ref())),
        ("Runtime", m.runtime.map_or_else(|| "-".into(), |r| format!("{r} min"))),
        ("Genres", genres(m.genres.iter().map(|g| g.name.clone()))),
        ("Rating", output::opt(m.vote_average.as_ref())),
    ];
    extras(
        &mut pairs,
        m.external_ids.as_ref(),
        m.credits.as_ref(),
        m.similar.as_ref(),
    );
    if let Some(ref images) = m.images {
        pairs.push((
            "Images",
            format!(
                "{} posters, {} backdrops",
                images.posters.len(),
                images.backdrops.len()
            ),
        ));
    }
    pairs.push(("Overview", output::opt(m.overview.as_ref())));
    output::detail_lines(&pairs)
}

fn tv_detail(t: &TvShow) -> String {
    let mut pairs = vec![
        ("ID", t.id.to_string()),
        ("Name", t.name.clone()),
        ("First aired", output::opt(t.first_air_date.as_ref())),
        ("Status", output::opt(t.status.as_ref())),
        (
            "Seasons",
            format!("{} ({} episodes)", t.number_of_seasons, t.number_of_episodes),
        ),
        ("Genres", genres(t.genres.iter().map(|g| g.name.clone()))),
        ("Rating", output::opt(t.vote_average.as_ref())),
    ];
    extras(
        &mut pairs,
        t.external_ids.as_ref(),
        t.credits.as_ref(),
        t.similar.as_ref(),
    );
    if let Some(ref groups) = t.episode_groups {
        let names = groups
            .iter()
            .map(|g| format!("{} ({} eps)", g.name, g.episode_count))
            .collect::<Vec<_>>()
            .join(", ");
        pairs.push(("Episode groups", names));
    }
    pairs.push(("Overview", output::opt(t.overview.as_ref())));
    output::detail_lines(&pairs)
}

fn omdb_detail(d: &OmdbDetails) -> String {
    let mut pairs = vec![
        ("IMDb", d.imdb_id.clone()),
        ("Title", d.title.clone()),
        ("Year", output::opt(d.year.as_ref())),
        ("Rated", output::opt(d.rated.as_ref())),
        ("Runtime", output::opt(d.runtime.as_ref())),
        ("IMDb rating", output::opt(d.imdb_rating.as_ref())),
    ];
    for rating in &d.ratings {
        pairs.push(("Rating", format!("{} ({})", rating.value, rating.source)));
    }
    pairs.push(("Plot", output::opt(d.plot.as_ref())));
    output::detail_lines(&pairs)
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn search(deck: &MediaDeck, args: SearchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let page = match args.command {
        SearchCommand::Movie { query, paging } => {
            util::require_text(&query, "query")?;
            let params = SearchParams::new(query)
                .page(paging.page)
                .page_size(paging.limit);
            deck.search_movies(params).load().await?
        }
        SearchCommand::Tv { query, paging } => {
            util::require_text(&query, "query")?;
            let params = SearchParams::new(query)
                .page(paging.page)
                .page_size(paging.limit);
            deck.search_tv(params).load().await?
        }
    };

    let out = output::render_list(
        global.output,
        &page.items,
        |m| SummaryRow::from(m),
        |m| m.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    if global.output == OutputFormat::Table && !global.quiet {
        eprintln!(
            "{}",
            output::page_footer(page.page_number, page.total_pages, page.total_count)
        );
    }
    Ok(())
}

pub async fn movie(deck: &MediaDeck, args: &DetailArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let movie = deck
        .movie_details(args.id, details_params(args))
        .load()
        .await
        .map_err(|e| error::not_found_hint(e, "movie", args.id, "search movie <query>"))?;
    let out = output::render_single(global.output, &*movie, movie_detail, |m| m.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn tv(deck: &MediaDeck, args: &DetailArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let show = deck
        .tv_details(args.id, details_params(args))
        .load()
        .await
        .map_err(|e| error::not_found_hint(e, "TV show", args.id, "search tv <query>"))?;
    let out = output::render_single(global.output, &*show, tv_detail, |t| t.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn omdb(deck: &MediaDeck, imdb_id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_text(imdb_id, "imdb-id")?;
    let details = deck
        .omdb_details(imdb_id)
        .load()
        .await
        .map_err(|e| error::not_found_hint(e, "title", imdb_id, "search movie <query>"))?;
    let out = output::render_single(global.output, &*details, omdb_detail, |d| d.title.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
