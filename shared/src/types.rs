//! API request and response types
//!
//! DTOs are the wire-safe view of stored records: passwords never appear,
//! and ownership is expressed as a foreign-key id rather than an embedded
//! owner. Nested collections are only ever one level deep.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Users
// ============================================================================

/// User view returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    /// Height in cm
    pub height: Option<f64>,
    /// Weight in kg
    pub weight: Option<f64>,
    pub fitness_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workouts: Option<Vec<WorkoutDto>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<GoalDto>>,
}

/// Goal entry submitted during registration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingGoal {
    pub category: Option<String>,
    /// Becomes the goal title
    pub goal: Option<String>,
    /// Becomes the goal description
    pub metric: Option<String>,
}

/// POST /api/users body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub fitness_level: Option<String>,
    #[serde(default)]
    pub goals: Option<Vec<OnboardingGoal>>,
}

/// PUT /api/users/{id} body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub fitness_level: Option<String>,
}

// ============================================================================
// Workouts and Exercises
// ============================================================================

/// Workout view, also accepted as the POST/PUT body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDto {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub start_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub end_time: Option<NaiveDateTime>,
    /// Duration in minutes
    pub duration: Option<i32>,
    #[serde(rename = "type")]
    pub workout_type: Option<String>,
    pub calories_burned: Option<i32>,
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercises: Option<Vec<ExerciseDto>>,
}

/// Exercise view, also accepted as the POST/PUT body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDto {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    /// Weight in kg
    pub weight: Option<f64>,
    /// Duration in seconds
    pub duration: Option<i32>,
    /// Rest time in seconds
    pub rest_time: Option<i32>,
    pub workout_id: Option<i64>,
}

/// Query for GET /api/workouts/user/{userId}/range
#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutRangeQuery {
    #[serde(deserialize_with = "deserialize_datetime")]
    pub start: NaiveDateTime,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub end: NaiveDateTime,
}

// ============================================================================
// Goals
// ============================================================================

/// Goal view, also accepted as the POST/PUT body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDto {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    /// active, completed, paused, cancelled
    pub status: Option<String>,
    pub category: Option<String>,
    pub target_value: Option<f64>,
    pub unit: Option<String>,
    pub current_value: Option<f64>,
    pub user_id: Option<i64>,
}

/// PATCH /api/goals/{id}/progress body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressRequest {
    pub current_value: f64,
}

// ============================================================================
// Errors
// ============================================================================

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Timestamp parsing
// ============================================================================

/// Parse a client timestamp.
///
/// Accepts RFC 3339 (offsets are normalised to UTC) as well as naive
/// `YYYY-MM-DDTHH:MM[:SS[.fff]]`, optionally with a trailing `Z`.
///
/// An unescaped `+` in a query string arrives as a space, so
/// `2024-03-01T00:00:00 02:00` is read as a `+02:00` offset.
pub fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }
    if let Some(split) = trimmed
        .find('T')
        .and_then(|t| trimmed[t..].rfind(' ').map(|space| t + space))
    {
        let restored = format!("{}+{}", &trimmed[..split], &trimmed[split + 1..]);
        if let Ok(dt) = DateTime::parse_from_rfc3339(&restored) {
            return Ok(dt.naive_utc());
        }
    }

    let naive = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .ok_or_else(|| format!("Invalid date-time '{}'", raw))
}

fn deserialize_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_optional_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| parse_datetime(&s).map_err(serde::de::Error::custom))
        .transpose()
}
