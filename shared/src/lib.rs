//! Fitness Tracker Shared Library
//!
//! This crate contains the wire types, vocabularies, and validation
//! helpers shared between the backend and its clients.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::{FitnessLevel, GoalStatus};
pub use types::*;
