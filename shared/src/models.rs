//! Domain vocabularies for the Fitness Tracker application
//!
//! Statuses and fitness levels travel over the wire as plain strings.
//! These enums give them a canonical lowercase spelling and accept any
//! casing on input.

use crate::errors::VocabularyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Goal lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Paused,
    Cancelled,
}

impl GoalStatus {
    pub const ALL: [GoalStatus; 4] = [
        GoalStatus::Active,
        GoalStatus::Completed,
        GoalStatus::Paused,
        GoalStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
            GoalStatus::Paused => "paused",
            GoalStatus::Cancelled => "cancelled",
        }
    }

    /// True when `status` names the active state, ignoring case
    pub fn is_active(status: &str) -> bool {
        status.trim().eq_ignore_ascii_case(GoalStatus::Active.as_str())
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalStatus {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        GoalStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| VocabularyError::GoalStatus(s.to_string()))
    }
}

/// Self-reported training experience
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl FitnessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessLevel::Beginner => "beginner",
            FitnessLevel::Intermediate => "intermediate",
            FitnessLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitnessLevel {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(FitnessLevel::Beginner),
            "intermediate" => Ok(FitnessLevel::Intermediate),
            "advanced" => Ok(FitnessLevel::Advanced),
            _ => Err(VocabularyError::FitnessLevel(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("active", GoalStatus::Active)]
    #[case("ACTIVE", GoalStatus::Active)]
    #[case(" Completed ", GoalStatus::Completed)]
    #[case("paused", GoalStatus::Paused)]
    #[case("Cancelled", GoalStatus::Cancelled)]
    fn test_goal_status_parses_any_case(#[case] input: &str, #[case] expected: GoalStatus) {
        assert_eq!(input.parse::<GoalStatus>().unwrap(), expected);
    }

    #[test]
    fn test_goal_status_rejects_unknown() {
        let err = "abandoned".parse::<GoalStatus>().unwrap_err();
        assert_eq!(err, VocabularyError::GoalStatus("abandoned".to_string()));
    }

    #[test]
    fn test_is_active_ignores_case() {
        assert!(GoalStatus::is_active("active"));
        assert!(GoalStatus::is_active("AcTiVe"));
        assert!(!GoalStatus::is_active("completed"));
        assert!(!GoalStatus::is_active(""));
    }

    #[test]
    fn test_default_status_is_active() {
        assert_eq!(GoalStatus::default().as_str(), "active");
    }

    #[rstest]
    #[case("beginner", FitnessLevel::Beginner)]
    #[case("Intermediate", FitnessLevel::Intermediate)]
    #[case("ADVANCED", FitnessLevel::Advanced)]
    fn test_fitness_level_parses_any_case(#[case] input: &str, #[case] expected: FitnessLevel) {
        assert_eq!(input.parse::<FitnessLevel>().unwrap(), expected);
    }

    #[test]
    fn test_fitness_level_rejects_unknown() {
        assert!("elite".parse::<FitnessLevel>().is_err());
    }
}
