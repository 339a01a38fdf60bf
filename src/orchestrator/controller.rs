//! Run lifecycle controller.
//!
//! Receives UI commands, drives submissions against the transport client,
//! and emits events for presentation layers. Each run is an independent
//! task: triggering a new run while another is in flight is allowed, and
//! their events interleave in arrival order.

use crate::engine::PlaygroundClient;
use crate::model::{InterpreterResult, RunConfig, RunResponse};
use crate::render::{render_outcome, LogLine};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub enum UiCommand {
    /// Submit the given editor contents as one run.
    Run(String),
    /// Reset the output log. Never touches the transport client.
    ClearLog,
    Quit,
}

/// Events consumed by presentation layers. `Append` and `LogCleared` are
/// the only events that mutate the output log.
#[derive(Debug, Clone)]
pub enum RunEvent {
    RunStarted { run_id: u64 },
    Append { run_id: u64, lines: Vec<LogLine> },
    LogCleared,
    /// Operator-visible status channel for transport failures, service
    /// failures, and unrecognized reply shapes. Leaves the log untouched.
    Diagnostic { message: String },
    RunFinished { run_id: u64 },
}

/// Interpret one service reply into log/diagnostic events.
///
/// A falsy `success` or an unrecognized interpreter result produces a
/// diagnostic and no appended lines; a completed run with empty output
/// produces no events at all.
pub fn events_for_response(run_id: u64, resp: &RunResponse) -> Vec<RunEvent> {
    if !resp.success {
        return vec![RunEvent::Diagnostic {
            message: format!("run {run_id}: service reported failure"),
        }];
    }
    match resp.outcome() {
        Some(result @ (InterpreterResult::Exception { .. } | InterpreterResult::Completed { .. })) => {
            let lines = render_outcome(&result);
            if lines.is_empty() {
                Vec::new()
            } else {
                vec![RunEvent::Append { run_id, lines }]
            }
        }
        Some(InterpreterResult::Unrecognized(raw)) => vec![RunEvent::Diagnostic {
            message: format!("run {run_id}: unrecognized interpreter result: {raw}"),
        }],
        None => vec![RunEvent::Diagnostic {
            message: format!("run {run_id}: reply carried no interpreter result"),
        }],
    }
}

/// Orchestrate runs based on UI commands until `Quit` (or the command
/// channel closing). In-flight submissions are not cancelled on quit; the
/// process exits and drops them.
pub async fn run_controller(
    cfg: RunConfig,
    event_tx: UnboundedSender<RunEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let client = Arc::new(PlaygroundClient::new(&cfg).context("create playground client")?);
    let mut next_run_id = 0u64;

    loop {
        match cmd_rx.recv().await {
            Some(UiCommand::Run(code)) => {
                next_run_id += 1;
                let run_id = next_run_id;
                let _ = event_tx.send(RunEvent::RunStarted { run_id });

                let client = client.clone();
                let tx = event_tx.clone();
                tokio::spawn(async move {
                    match client.submit(&code).await {
                        Ok(resp) => {
                            for ev in events_for_response(run_id, &resp) {
                                let _ = tx.send(ev);
                            }
                        }
                        Err(e) => {
                            let _ = tx.send(RunEvent::Diagnostic {
                                message: format!("run {run_id}: {e}"),
                            });
                        }
                    }
                    let _ = tx.send(RunEvent::RunFinished { run_id });
                });
            }
            Some(UiCommand::ClearLog) => {
                let _ = event_tx.send(RunEvent::LogCleared);
            }
            Some(UiCommand::Quit) | None => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn appended(events: &[RunEvent]) -> Vec<&LogLine> {
        events
            .iter()
            .filter_map(|ev| match ev {
                RunEvent::Append { lines, .. } => Some(lines.iter()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    #[test]
    fn service_failure_appends_nothing() {
        let resp = RunResponse::from_value(json!({ "success": false }));
        let events = events_for_response(1, &resp);
        assert!(appended(&events).is_empty());
        assert!(matches!(events.as_slice(), [RunEvent::Diagnostic { .. }]));
    }

    #[test]
    fn completed_output_appends_in_order() {
        let resp = RunResponse::from_value(json!({
            "success": true,
            "int_result": { "final_result": "success", "output": ["a", "b"] }
        }));
        let events = events_for_response(1, &resp);
        let lines = appended(&events);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "/ts$ a");
        assert_eq!(lines[1].text, "/ts$ b");
    }

    #[test]
    fn exception_appends_exactly_one_line() {
        let resp = RunResponse::from_value(json!({
            "success": true,
            "int_result": { "exception": "boom" }
        }));
        let events = events_for_response(1, &resp);
        let lines = appended(&events);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Exception raised: boom");
    }

    #[test]
    fn empty_output_emits_no_events() {
        let resp = RunResponse::from_value(json!({
            "success": true,
            "int_result": { "final_result": "success", "output": [] }
        }));
        assert!(events_for_response(1, &resp).is_empty());
    }

    #[test]
    fn unrecognized_result_is_diagnosed_not_rendered() {
        let resp = RunResponse::from_value(json!({
            "success": true,
            "int_result": { "final_result": "partial" }
        }));
        let events = events_for_response(7, &resp);
        assert!(appended(&events).is_empty());
        match events.as_slice() {
            [RunEvent::Diagnostic { message }] => {
                assert!(message.contains("run 7"), "{message}");
                assert!(message.contains("unrecognized"), "{message}");
            }
            other => panic!("expected one diagnostic, got {other:?}"),
        }
    }

    #[test]
    fn missing_int_result_is_diagnosed() {
        let resp = RunResponse::from_value(json!({ "success": true }));
        let events = events_for_response(1, &resp);
        assert!(appended(&events).is_empty());
        assert!(matches!(events.as_slice(), [RunEvent::Diagnostic { .. }]));
    }
}
