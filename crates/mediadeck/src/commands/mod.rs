//! Command dispatch: bridges CLI args -> core hooks -> output formatting.

pub mod catalog;
pub mod config_cmd;
pub mod dashboard;
pub mod files;
pub mod logs;
pub mod notify;
pub mod tags;
pub mod tasks;
pub mod torrents;
pub mod util;

use mediadeck_core::MediaDeck;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, deck: &MediaDeck, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Dashboard { watch } => dashboard::stats(deck, watch, global).await,
        Command::Resources { watch } => dashboard::resources(deck, watch, global).await,
        Command::Indexers => torrents::indexers(deck, global).await,
        Command::Torrents(args) => torrents::search(deck, args, global).await,
        Command::Yts(args) => torrents::yts(deck, args, global).await,
        Command::Tags(args) => tags::handle(deck, args, global).await,
        Command::Search(args) => catalog::search(deck, args, global).await,
        Command::Movie(args) => catalog::movie(deck, &args, global).await,
        Command::Tv(args) => catalog::tv(deck, &args, global).await,
        Command::Omdb { imdb_id } => catalog::omdb(deck, &imdb_id, global).await,
        Command::Logs(args) => logs::handle(deck, args, global).await,
        Command::Tasks(args) => tasks::handle(deck, args, global).await,
        Command::Upload(args) => files::upload(deck, args, global).await,
        Command::Docs(args) => files::docs(deck, args, global).await,
        Command::Notify(args) => notify::handle(deck, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
