//! Clap derive structures for the `mediadeck` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mediadeck -- command-line client for a self-hosted media server
#[derive(Debug, Parser)]
#[command(
    name = "mediadeck",
    version,
    about = "Browse and manage a media server from the command line",
    long_about = "A CLI for a self-hosted media server: dashboard stats, \
        catalog search, torrent indexers, tags, logs, background tasks, \
        uploads and notifications.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "MEDIADECK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 's', env = "MEDIADECK_SERVER", global = true)]
    pub server: Option<String>,

    /// Bearer token (overrides profile and keyring)
    #[arg(long, env = "MEDIADECK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MEDIADECK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "MEDIADECK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "MEDIADECK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Library counters (movies, shows, downloads)
    #[command(alias = "dash")]
    Dashboard {
        /// Keep running and print every refresh (every 20s)
        #[arg(long, short = 'w')]
        watch: bool,
    },

    /// Host CPU, memory and disk usage
    #[command(alias = "res")]
    Resources {
        /// Keep running and print every refresh (every 30s)
        #[arg(long, short = 'w')]
        watch: bool,
    },

    /// List configured torrent indexers
    Indexers,

    /// Search torrent indexers
    Torrents(TorrentSearchArgs),

    /// Manage library tags
    Tags(TagsArgs),

    /// Search the movie/TV catalog
    Search(SearchArgs),

    /// Show movie details
    Movie(DetailArgs),

    /// Show TV show details
    Tv(DetailArgs),

    /// Browse server logs
    Logs(LogsArgs),

    /// List background tasks or inspect one
    Tasks(TasksArgs),

    /// Search and inspect YTS releases
    Yts(YtsArgs),

    /// Look up a title by IMDb id
    Omdb {
        /// IMDb id (e.g., tt0111161)
        imdb_id: String,
    },

    /// Upload a file to the server
    Upload(UploadArgs),

    /// Browse server documents
    Docs(DocsArgs),

    /// Send a Telegram notification through the server
    Notify(NotifyArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Paging Arguments ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, Args)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Results per page
    #[arg(long, short = 'l', default_value = "20", value_parser = clap::value_parser!(u32).range(1..=200))]
    pub limit: u32,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TORRENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TorrentSearchArgs {
    /// Search terms
    pub query: String,

    /// Restrict to one indexer
    #[arg(long)]
    pub provider: Option<String>,

    /// Indexer category
    #[arg(long)]
    pub category: Option<String>,

    #[command(flatten)]
    pub paging: PageArgs,
}

#[derive(Debug, Args)]
pub struct YtsArgs {
    #[command(subcommand)]
    pub command: YtsCommand,
}

#[derive(Debug, Subcommand)]
pub enum YtsCommand {
    /// Search YTS releases
    Search {
        /// Search terms
        query: String,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// Show one YTS release with its torrents
    Get {
        /// YTS movie id
        id: u64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TAGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TagsArgs {
    #[command(subcommand)]
    pub command: TagsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TagsCommand {
    /// List tags
    #[command(alias = "ls")]
    List {
        /// Only tags whose name contains this text
        #[arg(long, short = 'f')]
        filter: Option<String>,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// Show one tag
    Get {
        /// Tag id
        id: u64,
    },

    /// Create a tag
    Create {
        /// Tag name
        name: String,

        /// Display color (e.g., "#ff8800")
        #[arg(long)]
        color: Option<String>,
    },

    /// Rename or recolor a tag
    Update {
        /// Tag id
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a tag
    #[command(alias = "rm")]
    Delete {
        /// Tag id
        id: u64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CATALOG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[command(subcommand)]
    pub command: SearchCommand,
}

#[derive(Debug, Subcommand)]
pub enum SearchCommand {
    /// Search movies
    Movie {
        /// Search terms
        query: String,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// Search TV shows
    Tv {
        /// Search terms
        query: String,

        #[command(flatten)]
        paging: PageArgs,
    },
}

#[derive(Debug, Args)]
pub struct DetailArgs {
    /// Catalog id
    pub id: u64,

    /// Include external ids (IMDb, TVDB)
    #[arg(long)]
    pub external_ids: bool,

    /// Include poster and backdrop listings
    #[arg(long)]
    pub images: bool,

    /// Include cast and crew
    #[arg(long)]
    pub credits: bool,

    /// Include episode groups (TV only)
    #[arg(long)]
    pub episode_groups: bool,

    /// Include similar titles
    #[arg(long)]
    pub similar: bool,

    /// Include everything above
    #[arg(long, short = 'a')]
    pub all: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOGS & TASKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LogsArgs {
    /// Minimum level (trace, debug, info, warn, error)
    #[arg(long)]
    pub level: Option<String>,

    /// Only entries from this source
    #[arg(long)]
    pub source: Option<String>,

    /// Only entries containing this text
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Only entries newer than this (e.g., "15m", "2h", "1day")
    #[arg(long)]
    pub since: Option<humantime::Duration>,

    #[command(flatten)]
    pub paging: PageArgs,
}

#[derive(Debug, Args)]
pub struct TasksArgs {
    /// Task id; lists all tasks when omitted
    pub id: Option<String>,

    /// Poll the task until it finishes
    #[arg(long, short = 'F', requires = "id")]
    pub follow: bool,

    /// Poll interval in seconds when following
    #[arg(long, default_value = "2", requires = "follow")]
    pub interval: u64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FILES & NOTIFICATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Local file to upload
    pub file: PathBuf,

    /// Target directory on the server
    #[arg(long, short = 'd')]
    pub destination: Option<String>,

    /// MIME type (sent as-is; the server guesses when omitted)
    #[arg(long)]
    pub content_type: Option<String>,
}

#[derive(Debug, Args)]
pub struct DocsArgs {
    /// Directory to list; the document root when omitted
    pub path: Option<String>,

    /// Include dotfiles
    #[arg(long)]
    pub hidden: bool,
}

#[derive(Debug, Args)]
pub struct NotifyArgs {
    /// Message text
    pub text: String,

    /// Interpret the text as Markdown or HTML
    #[arg(long, value_enum)]
    pub format: Option<MessageFormat>,

    /// Deliver without a notification sound
    #[arg(long)]
    pub silent: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MessageFormat {
    Markdown,
    Html,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG & COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or extend the config file with guided setup
    Init,

    /// Display current configuration (tokens redacted)
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles (* marks the default)
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
