//! Ready-made question catalogs.

pub mod learning_journey;

pub use learning_journey::{learning_journey, learning_journey_extended};
