//! Dashboard and host resource handlers.

use std::ops::ControlFlow;

use mediadeck_core::MediaDeck;
use mediadeck_core::models::{DashboardStats, SystemResources};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

fn stats_detail(s: &DashboardStats) -> String {
    output::detail_lines(&[
        ("Movies", s.movie_count.to_string()),
        ("TV shows", s.tv_show_count.to_string()),
        ("Episodes", s.episode_count.to_string()),
        ("Tags", s.tag_count.to_string()),
        ("Downloads", s.active_downloads.to_string()),
        ("Library size", output::bytes(s.library_size_bytes)),
        ("Last scan", output::timestamp(s.last_scan.as_ref())),
    ])
}

fn resources_detail(r: &SystemResources) -> String {
    let load = if r.load_average.is_empty() {
        "-".into()
    } else {
        r.load_average
            .iter()
            .map(|l| format!("{l:.2}"))
            .collect::<Vec<_>>()
            .join(" ")
    };
    output::detail_lines(&[
        ("CPU", output::percent(Some(r.cpu_percent))),
        (
            "Memory",
            format!(
                "{} / {} ({})",
                output::bytes(r.memory_used_bytes),
                output::bytes(r.memory_total_bytes),
                output::percent(r.memory_percent())
            ),
        ),
        (
            "Disk",
            format!(
                "{} / {} ({})",
                output::bytes(r.disk_used_bytes),
                output::bytes(r.disk_total_bytes),
                output::percent(r.disk_percent())
            ),
        ),
        ("Uptime", output::uptime(r.uptime_seconds)),
        ("Load", load),
    ])
}

fn print_stats(stats: &DashboardStats, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, stats, stats_detail, |s| {
        s.movie_count.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn print_resources(res: &SystemResources, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, res, resources_detail, |r| {
        format!("{:.1}", r.cpu_percent)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn stats(deck: &MediaDeck, watch: bool, global: &GlobalOpts) -> Result<(), CliError> {
    let query = deck.dashboard_stats();
    if watch {
        return util::follow(&query, |stats| {
            print_stats(stats, global)?;
            Ok(ControlFlow::Continue(()))
        })
        .await;
    }
    let stats = query.load().await?;
    print_stats(&stats, global)
}

pub async fn resources(deck: &MediaDeck, watch: bool, global: &GlobalOpts) -> Result<(), CliError> {
    let query = deck.system_resources();
    if watch {
        return util::follow(&query, |res| {
            print_resources(res, global)?;
            Ok(ControlFlow::Continue(()))
        })
        .await;
    }
    let res = query.load().await?;
    print_resources(&res, global)
}
