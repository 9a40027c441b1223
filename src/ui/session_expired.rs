use crate::infra::contracts::SessionExpiredHandler;

const SESSION_EXPIRED: &str = "SESSION_EXPIRED";

pub const LOGIN_HINT: &str = "Your session has expired or was rejected. Run `agrolens login` to sign in again.";

/// CLI stand-in for "navigate to the login page".
#[derive(Debug, Default)]
pub struct LoginPromptRedirect;

impl SessionExpiredHandler for LoginPromptRedirect {
    fn on_session_expired(&self) {
        tracing::warn!(code = SESSION_EXPIRED, "redirecting user to login");
        eprintln!("{LOGIN_HINT}");
    }
}
