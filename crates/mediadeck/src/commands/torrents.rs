//! Indexer, torrent search and YTS handlers.

use tabled::Tabled;

use mediadeck_core::MediaDeck;
use mediadeck_core::models::{
    Indexer, IndexerSearchParams, SearchParams, TorrentResult, YtsDetails, YtsMovie,
};

use crate::cli::{GlobalOpts, OutputFormat, TorrentSearchArgs, YtsArgs, YtsCommand};
use crate::error::{self, CliError};
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct IndexerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Categories")]
    categories: String,
    #[tabled(rename = "Last error")]
    last_error: String,
}

impl From<&Indexer> for IndexerRow {
    fn from(i: &Indexer) -> Self {
        Self {
            id: i.id.clone(),
            name: i.name.clone(),
            enabled: if i.enabled { "yes" } else { "no" }.into(),
            categories: i.categories.join(", "),
            last_error: output::opt(i.last_error.as_ref()),
        }
    }
}

#[derive(Tabled)]
struct TorrentRow {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Indexer")]
    indexer: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "S")]
    seeders: u32,
    #[tabled(rename = "L")]
    leechers: u32,
    #[tabled(rename = "Published")]
    published: String,
}

impl From<&TorrentResult> for TorrentRow {
    fn from(t: &TorrentResult) -> Self {
        Self {
            title: t.title.clone(),
            indexer: t.indexer.clone(),
            size: output::bytes(t.size_bytes),
            seeders: t.seeders,
            leechers: t.leechers,
            published: output::timestamp(t.published_at.as_ref()),
        }
    }
}

#[derive(Tabled)]
struct YtsRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Year")]
    year: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "IMDb")]
    imdb: String,
}

impl From<&YtsMovie> for YtsRow {
    fn from(m: &YtsMovie) -> Self {
        Self {
            id: m.id,
            title: m.title.clone(),
            year: output::opt(m.year.as_ref()),
            rating: output::opt(m.rating.as_ref()),
            imdb: output::opt(m.imdb_code.as_ref()),
        }
    }
}

#[derive(Tabled)]
struct YtsTorrentRow {
    #[tabled(rename = "Quality")]
    quality: String,
    #[tabled(rename = "Type")]
    release_type: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Seeds")]
    seeds: u32,
    #[tabled(rename = "Peers")]
    peers: u32,
}

fn yts_detail(d: &YtsDetails) -> String {
    let mut text = output::detail_lines(&[
        ("ID", d.id.to_string()),
        ("Title", d.title.clone()),
        ("Year", output::opt(d.year.as_ref())),
        ("Rating", output::opt(d.rating.as_ref())),
        ("Runtime", d.runtime.map_or_else(|| "-".into(), |m| format!("{m} min"))),
        ("Genres", d.genres.join(", ")),
        ("IMDb", output::opt(d.imdb_code.as_ref())),
        (
            "Best",
            d.best_torrent()
                .map_or_else(|| "-".into(), |t| format!("{} ({})", t.quality, t.hash)),
        ),
    ]);
    if !d.torrents.is_empty() {
        let rows: Vec<_> = d
            .torrents
            .iter()
            .map(|t| YtsTorrentRow {
                quality: t.quality.clone(),
                release_type: output::opt(t.release_type.as_ref()),
                size: output::bytes(t.size_bytes),
                seeds: t.seeds,
                peers: t.peers,
            })
            .collect();
        text.push_str("\n\n");
        text.push_str(&tabled::Table::new(rows).with(tabled::settings::Style::rounded()).to_string());
    }
    text
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn indexers(deck: &MediaDeck, global: &GlobalOpts) -> Result<(), CliError> {
    let list = deck.indexer_providers().load().await?;
    let out = output::render_list(
        global.output,
        list.as_slice(),
        |i| IndexerRow::from(i),
        |i| i.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn search(
    deck: &MediaDeck,
    args: TorrentSearchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_text(&args.query, "query")?;
    let params = IndexerSearchParams {
        provider: args.provider,
        category: args.category,
        page: args.paging.page,
        page_size: args.paging.limit,
        ..IndexerSearchParams::new(args.query)
    };
    let page = deck.indexer_search(params).load().await?;
    let out = output::render_list(global.output, &page.items, |t| TorrentRow::from(t), |t| {
        t.magnet_uri
            .clone()
            .or_else(|| t.info_hash.clone())
            .unwrap_or_else(|| t.title.clone())
    })?;
    output::print_output(&out, global.quiet);
    if global.output == OutputFormat::Table && !global.quiet {
        eprintln!(
            "{}",
            output::page_footer(page.page_number, page.total_pages, page.total_count)
        );
    }
    Ok(())
}

pub async fn yts(deck: &MediaDeck, args: YtsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        YtsCommand::Search { query, paging } => {
            util::require_text(&query, "query")?;
            let params = SearchParams::new(query)
                .page(paging.page)
                .page_size(paging.limit);
            let page = deck.yts_search(params).load().await?;
            let out = output::render_list(global.output, &page.items, |m| YtsRow::from(m), |m| {
                m.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        YtsCommand::Get { id } => {
            let details = deck
                .yts_details(id)
                .load()
                .await
                .map_err(|e| error::not_found_hint(e, "YTS release", id, "yts search <query>"))?;
            let out = output::render_single(global.output, &*details, yts_detail, |d| {
                d.best_torrent().map_or_else(String::new, |t| t.hash.clone())
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
