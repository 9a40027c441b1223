//! API layer: HTTP transport, session handling and typed endpoint facades.

pub mod advisory;
pub mod auth;
pub mod client;
pub mod disease;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod market;
pub mod rag;
pub mod response;
pub mod session_guard;
pub mod transport;
pub mod weather;

/// Returns the api module name for smoke checks.
pub fn module_name() -> &'static str {
    "api"
}
