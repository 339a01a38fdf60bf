//! Rendering of interpreter outcomes into output log lines.
//!
//! This module computes the lines the presentation layers append, and owns
//! the `OutputLog` they append into.

use crate::model::InterpreterResult;

/// Prompt marker prefixed to every captured stdout line.
pub const STDOUT_PROMPT: &str = "/ts$ ";
/// Prefix for the single line rendered when the submitted code raised.
pub const EXCEPTION_PREFIX: &str = "Exception raised: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Output,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub kind: LineKind,
    pub text: String,
}

impl LogLine {
    pub fn output(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Output,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Error,
            text: text.into(),
        }
    }
}

/// Translate one interpreter outcome into renderable lines.
///
/// An exception becomes exactly one error-styled line; a completed run
/// becomes one prompt-prefixed line per captured output entry, order
/// preserved. Unrecognized outcomes render nothing; the controller raises
/// the diagnostic for those.
pub fn render_outcome(result: &InterpreterResult) -> Vec<LogLine> {
    match result {
        InterpreterResult::Exception { message } => {
            vec![LogLine::error(format!("{EXCEPTION_PREFIX}{message}"))]
        }
        InterpreterResult::Completed { lines } => lines
            .iter()
            .map(|line| LogLine::output(format!("{STDOUT_PROMPT}{line}")))
            .collect(),
        InterpreterResult::Unrecognized(_) => Vec::new(),
    }
}

/// Append-only rendered history shown to the user.
///
/// The only state that survives across runs: it grows monotonically until
/// explicitly cleared, and is owned by whichever composition root wires
/// user triggers to the controller.
#[derive(Debug, Default)]
pub struct OutputLog {
    lines: Vec<LogLine>,
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, line: LogLine) {
        self.lines.push(line);
    }

    pub fn extend(&mut self, lines: impl IntoIterator<Item = LogLine>) {
        self.lines.extend(lines);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
