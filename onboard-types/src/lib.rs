//! Core types for the onboard crate.
//!
//! This crate provides the foundational types for a token-gated questionnaire:
//! - `QuestionCatalog` and `Question` - The ordered questions and their selection caps
//! - `AnswerSet` and `Selection` - The visitor's current choices per question
//! - `Session` - The visitor context produced by a successful token lookup
//! - `FlowState` and `FlowEvent` - The screens of the wizard and the inputs that move it
//! - `RecordStore` and `SubmissionSink` traits - For plugging in persistence

mod question;
pub use question::{Question, QuestionId};

mod catalog;
pub use catalog::QuestionCatalog;

mod selection;
pub use selection::{Selection, ToggleOutcome, toggle_selection};

mod answers;
pub use answers::AnswerSet;

mod session;
pub use session::Session;

mod flow_state;
pub use flow_state::{FlowEvent, FlowState};

mod error;
pub use error::{AuthError, CatalogError, FlowError, StoreError, SubmitError, ValidationWarning};

mod traits;
pub use traits::{RecordStore, SubmissionSink};
