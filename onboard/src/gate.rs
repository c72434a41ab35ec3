//! Token validation against the record store.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{AuthError, RecordStore, Session, ValidationWarning};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Resolves access tokens into sessions.
///
/// The gate trims the token, looks up the single active record carrying it,
/// and stamps the first access on a best-effort basis. Validating the same
/// token again returns an equivalent session without writing again.
#[derive(Clone)]
pub struct AccessGate {
    store: Arc<dyn RecordStore>,
    clock: Clock,
}

impl fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessGate").finish_non_exhaustive()
    }
}

impl AccessGate {
    /// Create a gate backed by `store`, using the system clock.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            clock: Arc::new(Utc::now),
        }
    }

    /// Use a custom clock for first-access timestamps.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Validate `token`, logging any non-fatal warning.
    pub async fn validate(&self, token: &str) -> Result<Session, AuthError> {
        let (session, warning) = self.validate_with_warnings(token).await?;
        if let Some(warning) = warning {
            warn!(%warning, "first access not recorded");
        }
        Ok(session)
    }

    /// Validate `token`, returning the non-fatal warning instead of logging it.
    pub async fn validate_with_warnings(
        &self,
        token: &str,
    ) -> Result<(Session, Option<ValidationWarning>), AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        debug!("looking up magic link");
        let mut session = match self.store.find_active_by_token(token).await {
            Ok(Some(session)) if session.active => session,
            Ok(_) => return Err(AuthError::InvalidOrInactive),
            Err(err) => return Err(AuthError::LookupFailed(err)),
        };

        let mut warning = None;
        if !session.has_been_accessed() {
            let now = (self.clock)();
            match self.store.mark_first_access(&session.id, now).await {
                Ok(()) => session.first_access_at = Some(now),
                Err(source) => {
                    warning = Some(ValidationWarning::FirstAccessWriteFailed {
                        session: session.short_id().to_string(),
                        source,
                    });
                }
            }
        }

        info!(session = session.short_id(), "magic link accepted");
        Ok((session, warning))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::TestStore;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn gate(store: &Arc<TestStore>) -> AccessGate {
        AccessGate::new(store.clone()).with_clock(fixed_now)
    }

    #[tokio::test]
    async fn empty_token_never_reaches_store() {
        let store = Arc::new(TestStore::new());
        let result = gate(&store).validate("   ").await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
        assert_eq!(store.lookup_count(), 0);
    }

    #[tokio::test]
    async fn token_is_trimmed() {
        let store = Arc::new(TestStore::new().with_record("tok", Session::new("user-1")));
        let session = gate(&store).validate("  tok\n").await.unwrap();
        assert_eq!(session.id, "user-1");
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let store = Arc::new(TestStore::new().with_record("tok", Session::new("user-1")));
        let result = gate(&store).validate("other").await;
        assert!(matches!(result, Err(AuthError::InvalidOrInactive)));
    }

    #[tokio::test]
    async fn inactive_record_is_invalid() {
        let store =
            Arc::new(TestStore::new().with_record("tok", Session::new("user-1").deactivated()));
        let result = gate(&store).validate("tok").await;
        assert!(matches!(result, Err(AuthError::InvalidOrInactive)));
    }

    #[tokio::test]
    async fn lookup_failure_is_retryable() {
        let store = Arc::new(
            TestStore::new()
                .with_record("tok", Session::new("user-1"))
                .failing_lookups(),
        );
        let err = gate(&store).validate("tok").await.unwrap_err();
        assert!(matches!(err, AuthError::LookupFailed(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn duplicate_token_fails_lookup() {
        let store = Arc::new(
            TestStore::new()
                .with_record("tok", Session::new("user-1"))
                .with_record("tok", Session::new("user-2")),
        );
        let err = gate(&store).validate("tok").await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::LookupFailed(crate::StoreError::Ambiguous(2))
        ));
        assert_eq!(store.update_count(), 0);
    }

    #[tokio::test]
    async fn first_access_is_stamped_once() {
        let store = Arc::new(TestStore::new().with_record("tok", Session::new("user-1")));
        let gate = gate(&store);

        let first = gate.validate("tok").await.unwrap();
        assert_eq!(first.first_access_at, Some(fixed_now()));
        assert_eq!(store.update_count(), 1);

        let second = gate.validate("tok").await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.first_access_at, Some(fixed_now()));
        assert_eq!(store.update_count(), 1);
    }

    #[tokio::test]
    async fn failed_first_access_write_is_only_a_warning() {
        let store = Arc::new(
            TestStore::new()
                .with_record("tok", Session::new("user-1"))
                .failing_updates(),
        );
        let (session, warning) = gate(&store).validate_with_warnings("tok").await.unwrap();
        assert_eq!(session.id, "user-1");
        assert!(session.first_access_at.is_none());
        assert!(matches!(
            warning,
            Some(ValidationWarning::FirstAccessWriteFailed { .. })
        ));
    }
}
