use std::fmt;

use crate::QuestionId;

/// The screen the visitor is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlowState {
    /// No valid token has been presented yet.
    #[default]
    Unauthenticated,

    /// Token accepted; the visitor can start or skip the questionnaire.
    Welcome,

    /// Answering question `n` (1-based).
    Question(QuestionId),

    /// Done. Terminal for this flow.
    Completed,
}

impl FlowState {
    /// Check if this is the terminal state.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// The question being answered, if any.
    pub fn question(&self) -> Option<QuestionId> {
        match self {
            Self::Question(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Welcome => write!(f, "welcome"),
            Self::Question(n) => write!(f, "question {n}"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// An input that may move the flow from one state to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowEvent {
    Authenticate,
    Start,
    Toggle,
    Next,
    Prev,
    Skip,
}

impl fmt::Display for FlowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authenticate => "authenticate",
            Self::Start => "start",
            Self::Toggle => "toggle",
            Self::Next => "next",
            Self::Prev => "prev",
            Self::Skip => "skip",
        };
        f.write_str(name)
    }
}
