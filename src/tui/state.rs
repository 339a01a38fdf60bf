use super::editor::Editor;
use crate::orchestrator::RunEvent;
use crate::render::OutputLog;

pub struct UiState {
    pub editor: Editor,
    pub log: OutputLog,
    /// Last diagnostic or info message; the operator-visible channel.
    pub status: String,
    pub in_flight: usize,
    pub runs_completed: u64,
    /// Lines scrolled up from the bottom of the output log; 0 = pinned.
    pub scroll_offset: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            editor: Editor::new(),
            log: OutputLog::new(),
            status: String::new(),
            in_flight: 0,
            runs_completed: 0,
            scroll_offset: 0,
        }
    }
}

/// Apply one controller event. UiState is owned by the UI thread only; this
/// is the single place the output log is mutated.
pub fn apply_event(state: &mut UiState, ev: RunEvent) {
    match ev {
        RunEvent::RunStarted { run_id } => {
            state.in_flight += 1;
            state.status = format!("run {run_id} submitted");
        }
        RunEvent::Append { lines, .. } => {
            state.log.extend(lines);
        }
        RunEvent::LogCleared => {
            state.log.clear();
            state.scroll_offset = 0;
        }
        RunEvent::Diagnostic { message } => {
            state.status = message;
        }
        RunEvent::RunFinished { .. } => {
            state.in_flight = state.in_flight.saturating_sub(1);
            state.runs_completed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::LogLine;

    fn texts(state: &UiState) -> Vec<&str> {
        state.log.lines().iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn appends_accumulate_in_arrival_order_across_runs() {
        let mut state = UiState::default();
        apply_event(&mut state, RunEvent::RunStarted { run_id: 1 });
        apply_event(&mut state, RunEvent::RunStarted { run_id: 2 });
        assert_eq!(state.in_flight, 2);
        // Run 2 resolves first; its lines land first.
        apply_event(
            &mut state,
            RunEvent::Append {
                run_id: 2,
                lines: vec![LogLine::output("/ts$ second")],
            },
        );
        apply_event(
            &mut state,
            RunEvent::Append {
                run_id: 1,
                lines: vec![LogLine::output("/ts$ first")],
            },
        );
        apply_event(&mut state, RunEvent::RunFinished { run_id: 2 });
        apply_event(&mut state, RunEvent::RunFinished { run_id: 1 });
        assert_eq!(texts(&state), ["/ts$ second", "/ts$ first"]);
        assert_eq!(state.in_flight, 0);
        assert_eq!(state.runs_completed, 2);
    }

    #[test]
    fn clear_resets_the_log_and_is_idempotent() {
        let mut state = UiState::default();
        apply_event(
            &mut state,
            RunEvent::Append {
                run_id: 1,
                lines: vec![LogLine::output("/ts$ a")],
            },
        );
        apply_event(&mut state, RunEvent::LogCleared);
        assert!(state.log.is_empty());
        apply_event(&mut state, RunEvent::LogCleared);
        assert!(state.log.is_empty());
    }

    #[test]
    fn diagnostics_touch_the_status_line_not_the_log() {
        let mut state = UiState::default();
        apply_event(
            &mut state,
            RunEvent::Diagnostic {
                message: "run 1: service reported failure".into(),
            },
        );
        assert!(state.log.is_empty());
        assert_eq!(state.status, "run 1: service reported failure");
    }
}
