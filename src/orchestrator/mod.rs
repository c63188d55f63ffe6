//! Application-level orchestration.
//!
//! This module owns the lookup lifecycle: one active request, its timeout and
//! cancellation, outcome classification, and failure alert gating. UI/CLI
//! layers send commands in and render the events that come back.

mod alert_gate;
mod controller;

pub(crate) use controller::{run_controller, LookupController, UiCommand};
