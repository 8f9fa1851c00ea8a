//! The interactive command loop.

use std::sync::Arc;

use anyhow::{Context, Result};
use client_core::{CommitOutcome, Controller, EventOutcome, RemoteStore, UiEvent};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    task::JoinSet,
};
use tracing::{info, warn};

use crate::{
    commands::{parse_command, Command, ParseError, HELP},
    events::{UiError, UiErrorContext},
};

/// Reads commands until `quit` or end of input, then waits for every
/// dispatched handler so no pending commit, delete or checkout is dropped.
pub async fn run_session<S, R>(controller: Arc<Controller<S>>, input: R) -> Result<()>
where
    S: RemoteStore + 'static,
    R: AsyncBufRead + Unpin,
{
    let mut handlers = JoinSet::new();
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::Event(event) => {
                // Handlers run concurrently, like clicks that do not wait for the
                // previous request to resolve.
                let controller = Arc::clone(&controller);
                handlers.spawn(async move { dispatch(&controller, event).await });
            }
        }
    }

    if !handlers.is_empty() {
        info!(pending = handlers.len(), "waiting for in-flight actions");
    }
    while let Some(joined) = handlers.join_next().await {
        if let Err(err) = joined {
            warn!(error = %err, "action handler did not finish");
        }
    }
    Ok(())
}

async fn dispatch<S: RemoteStore>(controller: &Controller<S>, event: UiEvent) {
    match controller.handle(event).await {
        Ok(outcome) => report_outcome(&outcome),
        Err(err) => {
            let ui_err = UiError::from_controller(UiErrorContext::for_event(&event), &err);
            if ui_err.is_retryable() {
                warn!(context = ?ui_err.context(), ?event, "action failed; retry possible");
            }
            eprintln!("{}", ui_err.status_line());
        }
    }
}

fn report_outcome(outcome: &EventOutcome) {
    match outcome {
        EventOutcome::Committed(CommitOutcome::Skipped) => {
            println!("nothing staged; use '+ <id>' first")
        }
        EventOutcome::Committed(CommitOutcome::Created(line) | CommitOutcome::Updated(line)) => {
            println!("cart: {} x {}", line.content, line.amount)
        }
        EventOutcome::Deleted(id) => println!("removed item {id} from cart"),
        EventOutcome::CheckedOut => println!("checkout complete"),
        EventOutcome::Staged { .. } | EventOutcome::Unchanged | EventOutcome::Refreshed => {}
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
