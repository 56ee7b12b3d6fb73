//! Error types for the Fitness Tracker vocabularies

use thiserror::Error;

/// Raised when a free-text value does not belong to a known vocabulary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VocabularyError {
    #[error("Invalid goal status '{0}'. Must be one of: active, completed, paused, cancelled")]
    GoalStatus(String),

    #[error("Invalid fitness level '{0}'. Must be one of: beginner, intermediate, advanced")]
    FitnessLevel(String),
}
