//! Notification handler.

use mediadeck_core::MediaDeck;
use mediadeck_core::models::{ParseMode, TelegramMessage};

use crate::cli::{GlobalOpts, MessageFormat, NotifyArgs};
use crate::error::CliError;

use super::util;

pub async fn handle(deck: &MediaDeck, args: NotifyArgs, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_text(&args.text, "text")?;
    let message = TelegramMessage {
        parse_mode: args.format.map(|f| match f {
            MessageFormat::Markdown => ParseMode::Markdown,
            MessageFormat::Html => ParseMode::Html,
        }),
        silent: args.silent,
        ..TelegramMessage::text(args.text)
    };
    deck.send_notification().mutate(message).await?;
    if !global.quiet {
        eprintln!("Notification sent");
    }
    Ok(())
}
