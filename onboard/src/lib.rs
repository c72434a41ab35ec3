//! # onboard
//!
//! Token-gated onboarding questionnaire. Storage-agnostic.
//!
//! A visitor presents an access token, lands on a welcome screen, walks through
//! an ordered catalog of questions, and finishes on a completion screen where
//! their answers are handed to a submission sink.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use onboard::{AccessGate, Flow, FlowState, Question, QuestionCatalog};
//!
//! let catalog = QuestionCatalog::new(vec![
//!     Question::single(1, "How did you hear about us?", ["Friend", "Search", "Ad"]),
//!     Question::multi(2, "What do you want to learn?", ["Rust", "Go", "Zig"], 2),
//! ])?;
//!
//! let gate = AccessGate::new(store.clone());
//! let mut flow = Flow::new(Arc::new(catalog), gate, store);
//!
//! flow.authenticate(&token).await?;
//! flow.start()?;
//! flow.toggle("Friend")?;
//! flow.next().await?;
//! ```
//!
//! ## States
//!
//! - `Unauthenticated` - waiting for a valid token
//! - `Welcome` - start or skip the questionnaire
//! - `Question(n)` - answering question `n`; `next` needs a selection
//! - `Completed` - terminal; answers were submitted once
//!
//! ## Stores
//!
//! Persistence lives behind `RecordStore` and `SubmissionSink`:
//! - `onboard-store-rest` - PostgREST-style HTTP API
//! - `TestStore` / `RecordingSink` - in-memory, for tests

// Re-export all types from onboard-types
pub use onboard_types::*;

mod gate;
pub use gate::AccessGate;

mod flow;
pub use flow::Flow;

// In-memory store for driving the flow without I/O
mod test_store;
pub use test_store::{RecordingSink, TestStore};
