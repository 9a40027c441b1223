//! UI layer: terminal I/O and text rendering for the CLI.

pub mod render;
pub mod session_expired;
pub mod terminal;

/// Returns the UI module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
