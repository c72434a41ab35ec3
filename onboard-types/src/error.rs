use crate::{FlowEvent, FlowState, QuestionId};

/// Error type for record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The lookup matched more than one active record.
    #[error("Expected at most one record, found {0}")]
    Ambiguous(usize),

    /// Backend-specific failure (network, HTTP status, decoding, etc.)
    #[error("Record store error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// Create a backend error from any error type.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }
}

/// Why a token did not yield a session.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token was empty after trimming; nothing was looked up.
    #[error("No magic link token provided")]
    MissingToken,

    /// No active record carries this token.
    #[error("Invalid or inactive magic link")]
    InvalidOrInactive,

    /// The lookup itself failed, or matched more than one record.
    #[error("Could not verify magic link, please try again: {0}")]
    LookupFailed(#[source] StoreError),
}

impl AuthError {
    /// Check if resubmitting the same token might succeed.
    ///
    /// Transport failures are transient; an ambiguous token is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LookupFailed(StoreError::Backend(_)))
    }
}

/// A non-fatal problem encountered while validating a token.
///
/// Warnings are logged and never reach the visitor.
#[derive(Debug, thiserror::Error)]
pub enum ValidationWarning {
    /// Stamping the first-access time failed; the session is still valid.
    #[error("Failed to record first access for session {session}: {source}")]
    FirstAccessWriteFailed {
        session: String,
        #[source]
        source: StoreError,
    },
}

/// Error type for the terminal submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Backend-specific failure (network, HTTP status, etc.)
    #[error("Submission failed: {0}")]
    Backend(#[from] anyhow::Error),
}

impl SubmitError {
    /// Create a backend error from any error type.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }
}

/// Why a flow event was rejected. The flow state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// The event has no transition from the current state.
    #[error("Cannot {event} while {state}")]
    InvalidTransition { state: FlowState, event: FlowEvent },

    /// `next` was requested on a question with nothing selected.
    #[error("Question {question} needs at least one answer")]
    SelectionRequired { question: QuestionId },
}

/// Error type for building a question catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog has no questions")]
    Empty,

    #[error("Question ids must be contiguous from 1: expected {expected}, found {found}")]
    NonContiguousId {
        expected: QuestionId,
        found: QuestionId,
    },

    #[error("Question {0} has no options")]
    NoOptions(QuestionId),

    #[error("Question {question} lists option {option:?} more than once")]
    DuplicateOption { question: QuestionId, option: String },

    #[error("Question {0} allows zero selections")]
    ZeroMaxSelections(QuestionId),

    #[error("Malformed catalog: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            AuthError::InvalidOrInactive.to_string(),
            "Invalid or inactive magic link"
        );
        assert_eq!(
            FlowError::InvalidTransition {
                state: FlowState::Welcome,
                event: FlowEvent::Next,
            }
            .to_string(),
            "Cannot next while welcome"
        );
        assert_eq!(
            FlowError::SelectionRequired { question: 3 }.to_string(),
            "Question 3 needs at least one answer"
        );
    }

    #[test]
    fn only_lookup_failures_are_retryable() {
        assert!(!AuthError::MissingToken.is_retryable());
        assert!(!AuthError::InvalidOrInactive.is_retryable());
        assert!(AuthError::LookupFailed(StoreError::backend(anyhow::anyhow!("timeout"))).is_retryable());
        assert!(!AuthError::LookupFailed(StoreError::Ambiguous(2)).is_retryable());
    }
}
