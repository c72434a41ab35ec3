//! The state machine driving the questionnaire.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::{
    AccessGate, AnswerSet, AuthError, FlowError, FlowEvent, FlowState, Question, QuestionCatalog,
    Selection, Session, SubmissionSink, ToggleOutcome,
};

/// One visitor's walk through the questionnaire.
///
/// Transitions:
///
/// ```text
/// Unauthenticated --authenticate ok--> Welcome
/// Welcome         --start-->           Question(1)
/// Welcome         --skip-->            Completed
/// Question(n)     --next, answered-->  Question(n+1) | Completed (n == Q)
/// Question(n)     --prev-->            Question(n-1) | Welcome   (n == 1)
/// Question(n)     --skip-->            Completed
/// ```
///
/// Rejected events return a `FlowError` and leave the state untouched.
/// Entering `Completed` hands the answers to the submission sink exactly once;
/// a failing sink is logged and does not undo the transition.
pub struct Flow {
    catalog: Arc<QuestionCatalog>,
    gate: AccessGate,
    sink: Arc<dyn SubmissionSink>,
    state: FlowState,
    session: Option<Session>,
    answers: Option<AnswerSet>,
    auth_error: Option<AuthError>,
    submitted: bool,
}

impl fmt::Debug for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flow")
            .field("state", &self.state)
            .field("session", &self.session)
            .field("answers", &self.answers)
            .field("auth_error", &self.auth_error)
            .field("submitted", &self.submitted)
            .finish_non_exhaustive()
    }
}

impl Flow {
    /// Create a flow in the `Unauthenticated` state.
    pub fn new(
        catalog: Arc<QuestionCatalog>,
        gate: AccessGate,
        sink: Arc<dyn SubmissionSink>,
    ) -> Self {
        Self {
            catalog,
            gate,
            sink,
            state: FlowState::Unauthenticated,
            session: None,
            answers: None,
            auth_error: None,
            submitted: false,
        }
    }

    /// The current screen.
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// The catalog being walked.
    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    /// The authenticated session, once a token has been accepted.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The current answers. `None` before authentication and after submission.
    pub fn answers(&self) -> Option<&AnswerSet> {
        self.answers.as_ref()
    }

    /// Why the last token was rejected, for display.
    pub fn auth_error(&self) -> Option<&AuthError> {
        self.auth_error.as_ref()
    }

    /// Check if the answers have been handed to the sink.
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// The question on screen, if any.
    pub fn current_question(&self) -> Option<&Question> {
        self.state.question().map(|n| self.catalog.at(n))
    }

    /// The selection for the question on screen, if any.
    pub fn current_selection(&self) -> Option<&Selection> {
        let n = self.state.question()?;
        self.answers.as_ref().map(|answers| answers.get(n))
    }

    /// `(n, Q)` while answering question `n` of `Q`.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.state.question().map(|n| (n, self.catalog.count()))
    }

    /// Check if `next` would be accepted.
    pub fn can_advance(&self) -> bool {
        self.current_selection().is_some_and(|s| !s.is_empty())
    }

    /// Present an access token.
    ///
    /// On success the flow moves to `Welcome` with a fresh answer set. On
    /// failure it stays `Unauthenticated` and the error is kept in
    /// [`Flow::auth_error`]; the returned state tells the two apart.
    pub async fn authenticate(&mut self, token: &str) -> Result<FlowState, FlowError> {
        self.expect_state(FlowEvent::Authenticate, |s| {
            s == FlowState::Unauthenticated
        })?;

        match self.gate.validate(token).await {
            Ok(session) => {
                self.auth_error = None;
                self.answers = Some(AnswerSet::new(self.catalog.clone()));
                self.session = Some(session);
                self.transition(FlowState::Welcome);
            }
            Err(err) => {
                debug!(%err, "magic link rejected");
                self.auth_error = Some(err);
            }
        }
        Ok(self.state)
    }

    /// Leave the welcome screen for the first question.
    pub fn start(&mut self) -> Result<FlowState, FlowError> {
        self.expect_state(FlowEvent::Start, |s| s == FlowState::Welcome)?;
        if let Some(session) = &self.session {
            info!(session = session.short_id(), "starting learning journey");
        }
        self.transition(FlowState::Question(1));
        Ok(self.state)
    }

    /// Toggle `option` on the question on screen.
    ///
    /// Returns the updated selection and what the toggle did; a full
    /// multi-choice selection reports [`ToggleOutcome::LimitReached`].
    ///
    /// # Panics
    ///
    /// Panics if `option` is not one of the current question's options.
    #[track_caller]
    pub fn toggle(&mut self, option: &str) -> Result<(&Selection, ToggleOutcome), FlowError> {
        let state = self.state;
        let (Some(n), Some(answers)) = (state.question(), self.answers.as_mut()) else {
            return Err(FlowError::InvalidTransition {
                state,
                event: FlowEvent::Toggle,
            });
        };
        Ok(answers.toggle(n, option))
    }

    /// Advance to the next question, or complete after the last one.
    ///
    /// Rejected with [`FlowError::SelectionRequired`] while the current
    /// question has nothing selected.
    pub async fn next(&mut self) -> Result<FlowState, FlowError> {
        let Some(n) = self.state.question() else {
            return Err(self.invalid(FlowEvent::Next));
        };
        if !self.can_advance() {
            return Err(FlowError::SelectionRequired { question: n });
        }

        if n < self.catalog.count() {
            self.transition(FlowState::Question(n + 1));
        } else {
            self.complete().await;
        }
        Ok(self.state)
    }

    /// Go back one question, or to the welcome screen from the first.
    pub fn prev(&mut self) -> Result<FlowState, FlowError> {
        match self.state {
            FlowState::Question(1) => self.transition(FlowState::Welcome),
            FlowState::Question(n) => self.transition(FlowState::Question(n - 1)),
            _ => return Err(self.invalid(FlowEvent::Prev)),
        }
        Ok(self.state)
    }

    /// Jump straight to `Completed`, submitting whatever has been answered.
    pub async fn skip(&mut self) -> Result<FlowState, FlowError> {
        self.expect_state(FlowEvent::Skip, |s| {
            matches!(s, FlowState::Welcome | FlowState::Question(_))
        })?;
        if let Some(session) = &self.session {
            info!(session = session.short_id(), from = %self.state, "questionnaire skipped");
        }
        self.complete().await;
        Ok(self.state)
    }

    async fn complete(&mut self) {
        self.transition(FlowState::Completed);
        if self.submitted {
            return;
        }
        self.submitted = true;

        let (Some(session), Some(answers)) = (self.session.as_ref(), self.answers.take()) else {
            return;
        };
        match self.sink.submit(session, &answers).await {
            Ok(()) => info!(
                session = session.short_id(),
                answered = answers.answered_count(),
                "answers submitted"
            ),
            Err(err) => error!(
                %err,
                session = session.short_id(),
                "failed to submit answers"
            ),
        }
    }

    fn transition(&mut self, to: FlowState) {
        debug!(from = %self.state, %to, "flow transition");
        self.state = to;
    }

    fn expect_state(
        &self,
        event: FlowEvent,
        allowed: impl Fn(FlowState) -> bool,
    ) -> Result<(), FlowError> {
        if allowed(self.state) {
            Ok(())
        } else {
            Err(self.invalid(event))
        }
    }

    fn invalid(&self, event: FlowEvent) -> FlowError {
        FlowError::InvalidTransition {
            state: self.state,
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordingSink, TestStore};

    fn flow() -> (Flow, Arc<RecordingSink>) {
        let catalog = QuestionCatalog::new(vec![
            Question::single(1, "First", ["A", "B"]),
            Question::multi(2, "Second", ["X", "Y", "Z"], 2),
        ])
        .unwrap();
        let store = Arc::new(TestStore::new().with_record("tok", Session::new("user-1")));
        let sink = Arc::new(RecordingSink::new());
        let flow = Flow::new(Arc::new(catalog), AccessGate::new(store), sink.clone());
        (flow, sink)
    }

    #[tokio::test]
    async fn events_before_authentication_are_rejected() {
        let (mut flow, sink) = flow();
        assert!(matches!(
            flow.start(),
            Err(FlowError::InvalidTransition {
                state: FlowState::Unauthenticated,
                event: FlowEvent::Start,
            })
        ));
        assert!(flow.toggle("A").is_err());
        assert!(flow.next().await.is_err());
        assert!(flow.prev().is_err());
        assert!(flow.skip().await.is_err());
        assert_eq!(flow.state(), FlowState::Unauthenticated);
        assert_eq!(sink.attempts(), 0);
    }

    #[tokio::test]
    async fn authenticate_twice_is_rejected() {
        let (mut flow, _) = flow();
        flow.authenticate("tok").await.unwrap();
        assert!(flow.authenticate("tok").await.is_err());
        assert_eq!(flow.state(), FlowState::Welcome);
    }

    #[tokio::test]
    async fn toggle_on_welcome_is_rejected() {
        let (mut flow, _) = flow();
        flow.authenticate("tok").await.unwrap();
        assert!(matches!(
            flow.toggle("A"),
            Err(FlowError::InvalidTransition {
                event: FlowEvent::Toggle,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn progress_tracks_question() {
        let (mut flow, _) = flow();
        assert_eq!(flow.progress(), None);
        flow.authenticate("tok").await.unwrap();
        flow.start().unwrap();
        assert_eq!(flow.progress(), Some((1, 2)));
        assert_eq!(flow.current_question().map(Question::title), Some("First"));
        flow.toggle("A").unwrap();
        flow.next().await.unwrap();
        assert_eq!(flow.progress(), Some((2, 2)));
    }

    #[tokio::test]
    async fn answers_survive_going_back() {
        let (mut flow, _) = flow();
        flow.authenticate("tok").await.unwrap();
        flow.start().unwrap();
        flow.toggle("B").unwrap();
        flow.next().await.unwrap();
        flow.prev().unwrap();
        assert_eq!(flow.current_selection().unwrap().as_slice(), ["B"]);
        flow.prev().unwrap();
        flow.start().unwrap();
        assert!(flow.can_advance());
    }

    #[tokio::test]
    async fn completed_is_terminal() {
        let (mut flow, sink) = flow();
        flow.authenticate("tok").await.unwrap();
        flow.skip().await.unwrap();
        assert!(flow.skip().await.is_err());
        assert!(flow.prev().is_err());
        assert!(flow.start().is_err());
        assert!(flow.is_submitted());
        assert!(flow.answers().is_none());
        assert_eq!(sink.attempts(), 1);
    }
}
