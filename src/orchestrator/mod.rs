//! Application-level orchestration utilities.
//!
//! This module owns run lifecycle control and response interpretation.
//! UI/CLI layers send commands in and apply the emitted events to their
//! output log, keeping responsibilities separated.

mod controller;

pub use controller::{events_for_response, run_controller, RunEvent, UiCommand};
