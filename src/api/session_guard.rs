use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    domain::result::InboundResult,
    infra::contracts::{CredentialStore, SessionExpiredHandler},
};

const SESSION_EXPIRED: &str = "SESSION_EXPIRED";
const SESSION_CLEAR_FAILED: &str = "SESSION_CLEAR_FAILED";

/// Watches every result for a rejected session.
///
/// A 401 always empties the credential store. The expiry handler runs once per
/// burst: later 401s are ignored until [`SessionGuard::rearm`] is called when a
/// fresh credential is installed.
pub struct SessionGuard {
    store: Arc<dyn CredentialStore>,
    handler: Arc<dyn SessionExpiredHandler>,
    expired: AtomicBool,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn CredentialStore>, handler: Arc<dyn SessionExpiredHandler>) -> Self {
        Self {
            store,
            handler,
            expired: AtomicBool::new(false),
        }
    }

    /// Applies session side effects and hands the result back untouched.
    pub fn inspect(&self, result: InboundResult) -> InboundResult {
        if result.is_unauthorized() {
            self.expire();
        }
        result
    }

    pub fn rearm(&self) {
        self.expired.store(false, Ordering::Release);
    }

    fn expire(&self) {
        if let Err(error) = self.store.clear() {
            tracing::warn!(
                code = SESSION_CLEAR_FAILED,
                error = %error,
                "failed to wipe persisted credentials after 401"
            );
        }

        if self.expired.swap(true, Ordering::AcqRel) {
            tracing::debug!("session expiry already handled in this burst");
            return;
        }

        tracing::warn!(
            code = SESSION_EXPIRED,
            "api rejected the session; credentials cleared"
        );
        self.handler.on_session_expired();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::credential::Credential,
        infra::{credential_store::InMemoryCredentialStore, error::AppError},
        test_support::RecordingExpiryHandler,
    };

    fn guard_with(
        credential: Option<Credential>,
    ) -> (SessionGuard, Arc<InMemoryCredentialStore>, Arc<RecordingExpiryHandler>) {
        let store = Arc::new(match credential {
            Some(credential) => InMemoryCredentialStore::with_credential(credential),
            None => InMemoryCredentialStore::default(),
        });
        let handler = Arc::new(RecordingExpiryHandler::default());
        let guard = SessionGuard::new(store.clone(), handler.clone());
        (guard, store, handler)
    }

    #[test]
    fn unauthorized_clears_store_and_redirects() {
        let (guard, store, handler) = guard_with(Some(Credential::new("stale", None)));

        let result = guard.inspect(InboundResult::from_response(401, Vec::new()));

        assert!(result.is_unauthorized());
        assert_eq!(store.get(), None);
        assert_eq!(handler.calls(), 1);
    }

    #[test]
    fn burst_of_unauthorized_results_redirects_once() {
        let (guard, store, handler) = guard_with(Some(Credential::new("stale", None)));

        for _ in 0..5 {
            guard.inspect(InboundResult::from_response(401, Vec::new()));
        }

        assert_eq!(store.get(), None);
        assert_eq!(handler.calls(), 1);
    }

    #[test]
    fn rearm_allows_next_burst_to_redirect() {
        let (guard, store, handler) = guard_with(Some(Credential::new("stale", None)));

        guard.inspect(InboundResult::from_response(401, Vec::new()));
        store
            .set(Credential::new("fresh", None))
            .expect("set should succeed");
        guard.rearm();
        guard.inspect(InboundResult::from_response(401, Vec::new()));

        assert_eq!(store.get(), None);
        assert_eq!(handler.calls(), 2);
    }

    #[test]
    fn other_statuses_pass_through_untouched() {
        let (guard, store, handler) = guard_with(Some(Credential::new("live", None)));

        for status in [200, 400, 403, 404, 500] {
            let original = InboundResult::from_response(status, b"{\"error\":\"x\"}".to_vec());
            assert_eq!(guard.inspect(original.clone()), original);
        }
        assert_eq!(guard.inspect(InboundResult::unreachable(false)), InboundResult::unreachable(false));

        assert!(store.get().is_some());
        assert_eq!(handler.calls(), 0);
    }

    struct FailingStore;

    impl CredentialStore for FailingStore {
        fn get(&self) -> Option<Credential> {
            None
        }

        fn set(&self, _credential: Credential) -> Result<(), AppError> {
            Ok(())
        }

        fn clear(&self) -> Result<(), AppError> {
            Err(AppError::CredentialRemove {
                path: "credentials.json".into(),
                source: std::io::Error::other("read-only filesystem"),
            })
        }
    }

    #[test]
    fn failed_clear_still_redirects() {
        let handler = Arc::new(RecordingExpiryHandler::default());
        let guard = SessionGuard::new(Arc::new(FailingStore), handler.clone());

        guard.inspect(InboundResult::from_response(401, Vec::new()));

        assert_eq!(handler.calls(), 1);
    }

    struct ReentrantHandler {
        guard: std::sync::OnceLock<Arc<SessionGuard>>,
        calls: std::sync::atomic::AtomicUsize,
    }

    impl SessionExpiredHandler for ReentrantHandler {
        fn on_session_expired(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(guard) = self.guard.get() {
                guard.inspect(InboundResult::from_response(401, Vec::new()));
            }
        }
    }

    #[test]
    fn reentrant_unauthorized_from_handler_does_not_loop() {
        let handler = Arc::new(ReentrantHandler {
            guard: std::sync::OnceLock::new(),
            calls: std::sync::atomic::AtomicUsize::new(0),
        });
        let guard = Arc::new(SessionGuard::new(
            Arc::new(InMemoryCredentialStore::with_credential(Credential::new(
                "stale", None,
            ))),
            handler.clone(),
        ));
        let _ = handler.guard.set(guard.clone());

        guard.inspect(InboundResult::from_response(401, Vec::new()));

        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    }
}
