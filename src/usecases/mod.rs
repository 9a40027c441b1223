//! Use case layer: application workflows and orchestration.

pub mod bootstrap;
pub mod chat;
pub mod context;
pub mod dashboard;
pub mod login;
pub mod logout;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
