//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Green for good, yellow for in-progress, red for bad.
pub fn paint_state(text: &str, color: bool) -> String {
    if !color {
        return text.to_owned();
    }
    match text {
        "completed" | "success" | "enabled" | "info" => text.green().to_string(),
        "running" | "pending" | "warn" => text.yellow().to_string(),
        "failed" | "cancelled" | "error" | "disabled" => text.red().to_string(),
        _ => text.to_owned(),
    }
}

// ── Value formatters ─────────────────────────────────────────────────

pub fn bytes(n: u64) -> String {
    bytesize::ByteSize(n).to_string()
}

pub fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v:.1}%"))
}

pub fn timestamp(at: Option<&DateTime<Utc>>) -> String {
    at.map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}

pub fn opt<T: ToString>(value: Option<&T>) -> String {
    value.map_or_else(|| "-".into(), ToString::to_string)
}

/// Seconds as a short human duration ("3days 4h 12m").
pub fn uptime(seconds: u64) -> String {
    let rounded = seconds - seconds % 60;
    humantime::format_duration(std::time::Duration::from_secs(rounded)).to_string()
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single-item detail views
/// don't use the `Tabled` derive.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Footer under paged tables: "page 1/3 (57 total)".
pub fn page_footer(page: u32, total_pages: u64, total_count: u64) -> String {
    format!("page {page}/{} ({total_count} total)", total_pages.max(1))
}

/// `label: value` lines with the labels padded to one column.
pub fn detail_lines(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(label, value)| format!("{label:<width$}  {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let text = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(text)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Item {
        id: u64,
        name: &'static str,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Name")]
        name: String,
    }

    fn items() -> Vec<Item> {
        vec![
            Item { id: 1, name: "anime" },
            Item { id: 2, name: "4k" },
        ]
    }

    fn render(format: OutputFormat) -> String {
        render_list(
            format,
            &items(),
            |i| Row {
                name: i.name.to_owned(),
            },
            |i| i.id.to_string(),
        )
        .unwrap()
    }

    #[test]
    fn list_formats() {
        assert_eq!(render(OutputFormat::Plain), "1\n2");
        assert_eq!(
            render(OutputFormat::JsonCompact),
            r#"[{"id":1,"name":"anime"},{"id":2,"name":"4k"}]"#
        );
        assert!(render(OutputFormat::Yaml).contains("name: anime"));
        let table = render(OutputFormat::Table);
        assert!(table.contains("Name") && table.contains("4k"));
    }

    #[test]
    fn detail_labels_align() {
        let text = detail_lines(&[("ID", "7".into()), ("Name", "anime".into())]);
        assert_eq!(text, "ID    7\nName  anime");
    }

    #[test]
    fn formatters() {
        assert_eq!(percent(Some(12.345)), "12.3%");
        assert_eq!(percent(None), "-");
        assert_eq!(uptime(3_725), "1h 2m");
        assert_eq!(page_footer(1, 0, 0), "page 1/1 (0 total)");
        assert_eq!(paint_state("failed", false), "failed");
    }
}
