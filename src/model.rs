use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub base_url: String,
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

/// Request body for one submission. Created fresh per run; the editor
/// contents are carried verbatim, with no trimming or normalization.
#[derive(Debug, Serialize)]
pub struct CodeSubmission<'a> {
    pub code: &'a str,
}

/// Service reply envelope. `success` reports whether the service layer
/// itself completed, not whether the submitted code ran cleanly.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub success: bool,
    pub int_result: Option<Value>,
}

impl RunResponse {
    /// Build from a parsed reply body. The live service populates `success`
    /// with the string "success" rather than a boolean, so the field is
    /// read with JavaScript truthiness over the raw value.
    pub fn from_value(body: Value) -> Self {
        let success = body.get("success").map(is_truthy).unwrap_or(false);
        let int_result = body.get("int_result").filter(|v| !v.is_null()).cloned();
        Self {
            success,
            int_result,
        }
    }

    /// Decode the interpreter result, if the reply carried one.
    pub fn outcome(&self) -> Option<InterpreterResult> {
        self.int_result.clone().map(InterpreterResult::from_value)
    }
}

/// JavaScript truthiness: false, 0, "", and null are falsy; arrays and
/// objects (even empty ones) are truthy.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// How the remote interpreter run concluded.
///
/// The wire shape is a union discriminated by which fields are present:
/// an `exception` message, or `final_result == "success"` with captured
/// output lines. Anything else is kept verbatim as `Unrecognized` so
/// protocol drift stays visible instead of being dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpreterResult {
    Exception { message: String },
    Completed { lines: Vec<String> },
    Unrecognized(Value),
}

#[derive(Deserialize)]
struct RawInterpreterResult {
    exception: Option<String>,
    final_result: Option<String>,
    #[serde(default)]
    output: Vec<String>,
}

impl InterpreterResult {
    pub fn from_value(raw: Value) -> Self {
        let parsed: RawInterpreterResult = match serde_json::from_value(raw.clone()) {
            Ok(p) => p,
            Err(_) => return InterpreterResult::Unrecognized(raw),
        };
        // An exception message wins over final_result when both are present.
        if let Some(message) = parsed.exception {
            return InterpreterResult::Exception { message };
        }
        if parsed.final_result.as_deref() == Some("success") {
            return InterpreterResult::Completed {
                lines: parsed.output,
            };
        }
        InterpreterResult::Unrecognized(raw)
    }
}
