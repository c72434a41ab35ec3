//! In-memory store and sink for testing flows without I/O.
//!
//! `TestStore` holds records keyed by token and counts the calls it receives.
//! `RecordingSink` keeps every submission it is handed. Both can be told to
//! fail, to exercise the error paths.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use onboard::{AccessGate, Flow, RecordingSink, Session, TestStore};
//!
//! let store = Arc::new(TestStore::new().with_record("tok", Session::new("user-1")));
//! let sink = Arc::new(RecordingSink::new());
//! let mut flow = Flow::new(catalog, AccessGate::new(store.clone()), sink.clone());
//!
//! flow.authenticate("tok").await?;
//! flow.skip().await?;
//!
//! assert_eq!(sink.submissions().len(), 1);
//! assert_eq!(store.update_count(), 1);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{AnswerSet, RecordStore, Session, StoreError, SubmissionSink, SubmitError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A record store that keeps `(token, session)` pairs in memory.
#[derive(Debug, Default)]
pub struct TestStore {
    records: Mutex<Vec<(String, Session)>>,
    fail_lookups: bool,
    fail_updates: bool,
    lookups: AtomicUsize,
    updates: AtomicUsize,
}

impl TestStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record reachable through `token`.
    pub fn with_record(self, token: impl Into<String>, session: Session) -> Self {
        lock(&self.records).push((token.into(), session));
        self
    }

    /// Make every lookup fail with a backend error.
    pub fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    /// Make every first-access update fail with a backend error.
    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    /// Number of lookups received.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Number of first-access updates received.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    /// The stored record with id `id`, as it is now.
    pub fn record(&self, id: &str) -> Option<Session> {
        lock(&self.records)
            .iter()
            .find(|(_, session)| session.id == id)
            .map(|(_, session)| session.clone())
    }
}

#[async_trait]
impl RecordStore for TestStore {
    async fn find_active_by_token(&self, token: &str) -> Result<Option<Session>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups {
            return Err(StoreError::backend(anyhow!("lookup unavailable")));
        }

        let records = lock(&self.records);
        let mut matches = records
            .iter()
            .filter(|(t, session)| t == token && session.active)
            .map(|(_, session)| session);

        match (matches.next(), matches.count()) {
            (None, _) => Ok(None),
            (Some(session), 0) => Ok(Some(session.clone())),
            (Some(_), rest) => Err(StoreError::Ambiguous(rest + 1)),
        }
    }

    async fn mark_first_access(&self, id: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates {
            return Err(StoreError::backend(anyhow!("update unavailable")));
        }

        let mut records = lock(&self.records);
        match records.iter_mut().find(|(_, session)| session.id == id) {
            Some((_, session)) => {
                session.first_access_at = Some(at);
                Ok(())
            }
            None => Err(StoreError::backend(anyhow!("no record with id {id}"))),
        }
    }
}

/// A submission sink that remembers what it was given.
#[derive(Debug, Default)]
pub struct RecordingSink {
    submissions: Mutex<Vec<(Session, AnswerSet)>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl RecordingSink {
    /// Create a sink that accepts every submission.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that rejects every submission (and records nothing).
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Number of times `submit` was called, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Accepted submissions, oldest first.
    pub fn submissions(&self) -> Vec<(Session, AnswerSet)> {
        lock(&self.submissions).clone()
    }
}

#[async_trait]
impl SubmissionSink for RecordingSink {
    async fn submit(&self, session: &Session, answers: &AnswerSet) -> Result<(), SubmitError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SubmitError::backend(anyhow!("sink unavailable")));
        }
        lock(&self.submissions).push((session.clone(), answers.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_tokens_are_ambiguous() {
        let store = TestStore::new()
            .with_record("tok", Session::new("a"))
            .with_record("tok", Session::new("b"));
        assert!(matches!(
            store.find_active_by_token("tok").await,
            Err(StoreError::Ambiguous(2))
        ));
    }

    #[tokio::test]
    async fn inactive_duplicates_are_ignored() {
        let store = TestStore::new()
            .with_record("tok", Session::new("a"))
            .with_record("tok", Session::new("b").deactivated());
        let found = store.find_active_by_token("tok").await.unwrap();
        assert_eq!(found.map(|s| s.id), Some("a".to_string()));
    }

    #[tokio::test]
    async fn update_unknown_id_fails() {
        let store = TestStore::new();
        assert!(store.mark_first_access("ghost", Utc::now()).await.is_err());
    }
}
