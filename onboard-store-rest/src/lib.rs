//! # onboard-store-rest
//!
//! Record store for onboard backed by a PostgREST-style HTTP API, such as the
//! one a hosted Postgres backend exposes under `/rest/v1`.
//!
//! - `magic_link_users` holds one row per visitor, looked up by `magic_token`
//!   and `is_active`, with `first_access_at` stamped on first visit.
//! - `onboarding_responses` receives one row per completed questionnaire.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use onboard::{AccessGate, Flow};
//! use onboard_store_rest::{RestConfig, RestStore};
//!
//! let store = Arc::new(RestStore::new(RestConfig::from_env()?)?);
//! store.ping().await?;
//! let mut flow = Flow::new(catalog, AccessGate::new(store.clone()), store);
//! ```

mod config;
mod error;
mod record;
mod store;

pub use config::{ApiKey, KeyClaims, RestConfig};
pub use error::{ConfigError, RestError};
pub use record::{LinkRecord, SubmissionRow};
pub use store::RestStore;
