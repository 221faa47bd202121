//! Tag command handlers.

use tabled::Tabled;

use mediadeck_core::MediaDeck;
use mediadeck_core::hooks::keys;
use mediadeck_core::models::{CreateTag, Tag, TagQuery, UpdateTag};

use crate::cli::{GlobalOpts, OutputFormat, TagsArgs, TagsCommand};
use crate::error::{self, CliError};
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TagRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "Media")]
    media: u64,
}

impl From<&Tag> for TagRow {
    fn from(t: &Tag) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            color: output::opt(t.color.as_ref()),
            media: t.media_count,
        }
    }
}

fn tag_detail(t: &Tag) -> String {
    output::detail_lines(&[
        ("ID", t.id.to_string()),
        ("Name", t.name.clone()),
        ("Color", output::opt(t.color.as_ref())),
        ("Media", t.media_count.to_string()),
        ("Created", output::timestamp(t.created_at.as_ref())),
    ])
}

fn print_tag(tag: &Tag, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, tag, tag_detail, |t| t.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(deck: &MediaDeck, args: TagsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        TagsCommand::List { filter, paging } => {
            let query = TagQuery {
                search: filter.filter(|f| !f.trim().is_empty()),
                page: paging.page,
                page_size: paging.limit,
            };
            let page = deck.tags(query).load().await?;
            let out = output::render_list(
                global.output,
                &page.items,
                |t| TagRow::from(t),
                |t| t.name.clone(),
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

        TagsCommand::Get { id } => {
            let tag = deck
                .tag(id)
                .load()
                .await
                .map_err(|e| error::not_found_hint(e, "tag", id, "tags list"))?;
            print_tag(&tag, global)
        }

        TagsCommand::Create { name, color } => {
            util::require_text(&name, "name")?;
            let tag = deck.create_tag().mutate(CreateTag { name, color }).await?;
            deck.invalidate_tag(keys::TAGS);
            print_tag(&tag, global)
        }

        TagsCommand::Update { id, name, color } => {
            if name.is_none() && color.is_none() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "pass --name and/or --color".into(),
                });
            }
            let tag = deck
                .update_tag()
                .mutate((id, UpdateTag { name, color }))
                .await
                .map_err(|e| error::not_found_hint(e, "tag", id, "tags list"))?;
            deck.invalidate_tag(keys::TAGS);
            deck.invalidate_tag(keys::TAG);
            print_tag(&tag, global)
        }

        TagsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete tag {id}?"), global.yes)? {
                return Ok(());
            }
            deck.delete_tag()
                .mutate(id)
                .await
                .map_err(|e| error::not_found_hint(e, "tag", id, "tags list"))?;
            deck.invalidate_tag(keys::TAGS);
            deck.invalidate_tag(keys::TAG);
            if !global.quiet {
                eprintln!("Tag {id} deleted");
            }
            Ok(())
        }
    }
}
