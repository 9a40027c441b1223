//! Domain layer: core entities and business rules.

pub mod chat;
pub mod credential;
pub mod image;
pub mod request;
pub mod result;
pub mod status;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
