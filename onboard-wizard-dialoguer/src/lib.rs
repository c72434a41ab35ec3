//! # onboard-wizard-dialoguer
//!
//! Dialoguer front end for onboard.
//!
//! Drives a [`Flow`](onboard::Flow) from the terminal: the token is presented
//! once, then each screen is a menu. Question screens list the options with
//! check marks for the current selection, followed by `Next`, `Back` and
//! `Skip`. Escape cancels.
//!
//! ## Example
//!
//! ```rust,ignore
//! use onboard_wizard_dialoguer::DialoguerFrontend;
//!
//! let frontend = DialoguerFrontend::new();
//! let state = frontend.run(&mut flow, &token).await?;
//! assert!(state.is_completed());
//! ```

mod frontend;

pub use frontend::{DialoguerError, DialoguerFrontend};
