use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{AnswerSet, Session, StoreError, SubmitError};

/// Trait for the persistent store that holds visitor records.
///
/// Implementations talk to whatever actually keeps the records (an HTTP API,
/// a database, an in-memory map for tests). The access gate only needs these
/// two operations.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Find the active record whose token equals `token`.
    ///
    /// # Returns
    /// * `Ok(Some(session))` if exactly one active record matches
    /// * `Ok(None)` if no active record matches
    /// * `Err` on transport failure or if several records match
    async fn find_active_by_token(&self, token: &str) -> Result<Option<Session>, StoreError>;

    /// Set the first-access timestamp of record `id`.
    async fn mark_first_access(&self, id: &str, at: DateTime<Utc>) -> Result<(), StoreError>;
}

/// Trait for the collaborator that persists the final answers.
///
/// Called at most once per flow, when it completes. Retrying is up to the
/// implementation.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Persist `answers` for `session`.
    async fn submit(&self, session: &Session, answers: &AnswerSet) -> Result<(), SubmitError>;
}
