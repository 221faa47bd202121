//! Background task handlers.

use std::ops::ControlFlow;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Tabled;

use mediadeck_core::models::{TaskState, TaskStatus};
use mediadeck_core::{MediaDeck, hooks};

use crate::cli::{GlobalOpts, OutputFormat, TasksArgs};
use crate::error::{self, CliError};
use crate::output;

use super::util;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Started")]
    started: String,
}

fn progress(t: &TaskStatus) -> String {
    t.progress.map_or_else(|| "-".into(), |p| format!("{p:.0}%"))
}

fn task_detail(t: &TaskStatus) -> String {
    output::detail_lines(&[
        ("ID", t.id.clone()),
        ("Name", t.name.clone()),
        ("State", t.state.to_string()),
        ("Progress", progress(t)),
        ("Message", output::opt(t.message.as_ref())),
        ("Started", output::timestamp(t.started_at.as_ref())),
        ("Finished", output::timestamp(t.finished_at.as_ref())),
    ])
}

fn print_task(task: &TaskStatus, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, task, task_detail, |t| t.state.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
fn position(task: &TaskStatus) -> u64 {
    task.progress.map_or(0, |p| p.clamp(0.0, 100.0).round() as u64)
}

pub async fn handle(deck: &MediaDeck, args: TasksArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let Some(id) = args.id else {
        let tasks = deck.tasks().load().await?;
        let color = output::should_color(global.color);
        let out = output::render_list(
            global.output,
            tasks.as_slice(),
            |t| TaskRow {
                id: t.id.clone(),
                name: t.name.clone(),
                state: output::paint_state(&t.state.to_string(), color),
                progress: progress(t),
                started: output::timestamp(t.started_at.as_ref()),
            },
            |t| t.id.clone(),
        )?;
        output::print_output(&out, global.quiet);
        return Ok(());
    };

    util::require_text(&id, "id")?;
    if !args.follow {
        let task = deck
            .task_status(&id)
            .load()
            .await
            .map_err(|e| error::not_found_hint(e, "task", &id, "tasks"))?;
        return print_task(&task, global);
    }

    follow(deck, &id, Duration::from_secs(args.interval.max(1)), global).await
}

/// Poll one task until it reaches a terminal state.
async fn follow(
    deck: &MediaDeck,
    id: &str,
    every: Duration,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let descriptor = hooks::task_status(deck.client(), id);
    let options = descriptor.options().poll_every(every);
    let query = deck.query(descriptor.with_options(options));

    // Surface a bad id right away instead of polling forever.
    query
        .load()
        .await
        .map_err(|e| error::not_found_hint(e, "task", id, "tasks"))?;

    let interactive = global.output == OutputFormat::Table && !global.quiet;
    let bar = if interactive {
        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{bar:30}] {pos}%") {
            bar.set_style(style);
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut last = None;
    util::follow(&query, |task| {
        bar.set_position(position(task));
        bar.set_message(format!("{} ({})", task.name, task.state));
        last = Some(task.clone());
        Ok(if task.state.is_terminal() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        })
    })
    .await?;
    bar.finish_and_clear();

    let Some(task) = last else {
        return Ok(());
    };
    print_task(&task, global)?;
    if task.state == TaskState::Failed {
        return Err(CliError::ApiError {
            status: None,
            message: task
                .message
                .unwrap_or_else(|| format!("task {} failed", task.id)),
        });
    }
    Ok(())
}
