//! Upload and document browsing handlers.

use tabled::Tabled;

use mediadeck_core::MediaDeck;
use mediadeck_core::models::{DocumentEntry, DocumentQuery, UploadRequest, UploadResult};

use crate::cli::{DocsArgs, GlobalOpts, UploadArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DocumentRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Modified")]
    modified: String,
}

impl From<&DocumentEntry> for DocumentRow {
    fn from(d: &DocumentEntry) -> Self {
        Self {
            name: d.name.clone(),
            kind: d.kind.to_string(),
            size: d.size_bytes.map_or_else(|| "-".into(), output::bytes),
            modified: output::timestamp(d.modified_at.as_ref()),
        }
    }
}

fn upload_detail(r: &UploadResult) -> String {
    output::detail_lines(&[
        ("Path", r.path.clone()),
        ("Size", output::bytes(r.size_bytes)),
        ("Task", output::opt(r.task_id.as_ref())),
    ])
}

pub async fn upload(deck: &MediaDeck, args: UploadArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let file_name = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
        .ok_or_else(|| CliError::Validation {
            field: "file".into(),
            reason: format!("'{}' has no usable file name", args.file.display()),
        })?;
    let bytes = tokio::fs::read(&args.file).await?;
    tracing::info!(file = %file_name, size = bytes.len(), "uploading");

    let result = deck
        .upload_file()
        .mutate(UploadRequest {
            file_name,
            content_type: args.content_type,
            bytes,
            destination: args.destination,
        })
        .await?;

    let out = output::render_single(global.output, &*result, upload_detail, |r| r.path.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn docs(deck: &MediaDeck, args: DocsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let query = DocumentQuery {
        path: args.path.filter(|p| !p.trim().is_empty()),
        include_hidden: args.hidden,
    };
    let entries = deck.documents(query).load().await?;
    let out = output::render_list(
        global.output,
        entries.as_slice(),
        |d| DocumentRow::from(d),
        |d| d.path.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
