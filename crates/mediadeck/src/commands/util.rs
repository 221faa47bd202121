//! Shared helpers for command handlers.

use std::ops::ControlFlow;

use mediadeck_core::Query;

use crate::error::CliError;

/// Reject blank free-text arguments before they reach a query.
pub fn require_text(value: &str, field: &str) -> Result<(), CliError> {
    if value.trim().is_empty() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "must not be blank".into(),
        });
    }
    Ok(())
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Follow a mounted query until `on_data` breaks, the query goes away,
/// or the user hits Ctrl-C.
///
/// `on_data` runs once per new result. Failed refreshes are logged and
/// the previous data stays on screen; polling continues.
pub async fn follow<T, F>(query: &Query<T>, mut on_data: F) -> Result<(), CliError>
where
    T: Send + Sync + 'static,
    F: FnMut(&T) -> Result<ControlFlow<()>, CliError>,
{
    let mut stream = query.watch();
    let mut rendered = 0;
    let mut last_error = None;
    let mut snapshot = stream.latest();

    loop {
        if snapshot.data_update_count > rendered {
            if let Some(data) = snapshot.data.as_deref() {
                rendered = snapshot.data_update_count;
                if on_data(data)?.is_break() {
                    return Ok(());
                }
            }
        }
        if snapshot.error_updated_at != last_error {
            last_error = snapshot.error_updated_at;
            if let Some(ref error) = snapshot.error {
                tracing::warn!(
                    %error,
                    attempt = snapshot.failure_count,
                    "refresh failed, retrying on next poll"
                );
            }
        }

        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => return Ok(()),
            next = stream.changed() => match next {
                Some(next) => snapshot = next,
                None => return Ok(()),
            },
        }
    }
}
