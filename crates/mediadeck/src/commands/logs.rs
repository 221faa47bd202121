//! Server log handler.

use chrono::Utc;
use tabled::Tabled;

use mediadeck_core::MediaDeck;
use mediadeck_core::models::{LogEntry, LogLevel, LogQuery};

use crate::cli::{GlobalOpts, LogsArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Message")]
    message: String,
}

fn build_query(args: LogsArgs) -> Result<LogQuery, CliError> {
    let level = args
        .level
        .map(|raw| {
            raw.parse::<LogLevel>().map_err(|_| CliError::Validation {
                field: "level".into(),
                reason: format!("unknown level '{raw}' (trace, debug, info, warn, error)"),
            })
        })
        .transpose()?;

    let since = args
        .since
        .map(|ago| {
            chrono::Duration::from_std(*ago)
                .map(|d| Utc::now() - d)
                .map_err(|_| CliError::Validation {
                    field: "since".into(),
                    reason: format!("'{ago}' is too far back"),
                })
        })
        .transpose()?;

    Ok(LogQuery {
        level,
        source: args.source,
        search: args.filter,
        since,
        page: args.paging.page,
        page_size: args.paging.limit,
    })
}

pub async fn handle(deck: &MediaDeck, args: LogsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let query = build_query(args)?;
    let page = deck.logs(query).load().await?;

    let color = output::should_color(global.color);
    let out = output::render_list(
        global.output,
        &page.items,
        |e: &LogEntry| LogRow {
            time: output::timestamp(Some(&e.timestamp)),
            level: output::paint_state(&e.level.to_string(), color),
            source: output::opt(e.source.as_ref()),
            message: e.message.clone(),
        },
        |e| e.message.clone(),
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use crate::cli::PageArgs;

    use super::*;

    fn args(level: Option<&str>, since: Option<Duration>) -> LogsArgs {
        LogsArgs {
            level: level.map(str::to_owned),
            source: None,
            filter: Some("scan".into()),
            since: since.map(humantime::Duration::from),
            paging: PageArgs { page: 2, limit: 10 },
        }
    }

    #[test]
    fn parses_level_and_since() {
        let query = build_query(args(Some("WARN"), Some(Duration::from_secs(900)))).unwrap();
        assert_eq!(query.level, Some(LogLevel::Warn));
        assert_eq!(query.search.as_deref(), Some("scan"));
        assert_eq!(query.page, 2);
        let since = query.since.unwrap();
        assert!(Utc::now() - since >= chrono::Duration::seconds(900));
    }

    #[test]
    fn rejects_unknown_level() {
        let err = build_query(args(Some("loud"), None)).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "level"));
    }
}
