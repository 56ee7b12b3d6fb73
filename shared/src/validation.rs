//! Input validation functions
//!
//! This module provides validation utilities for user input.
//! Email syntax is checked through the `validator` crate.

use chrono::{NaiveDate, NaiveDateTime};
use validator::ValidateEmail;

/// Validate username: 3-50 characters of letters, digits, `_`, `.` or `-`
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("Username is required".to_string());
    }
    if username.len() < 3 {
        return Err("Username must be at least 3 characters".to_string());
    }
    if username.len() > 50 {
        return Err("Username must be at most 50 characters".to_string());
    }
    let username_regex = regex_lite::Regex::new(r"^[A-Za-z0-9_.\-]+$")
        .map_err(|e| format!("Username pattern error: {}", e))?;
    if !username_regex.is_match(username) {
        return Err(
            "Username may only contain letters, digits, '_', '.' and '-'".to_string(),
        );
    }
    Ok(())
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    if !email.validate_email() {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password presence and length
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.trim().is_empty() {
        return Err("Password is required".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate height value (in cm)
/// Valid range: 50-300 cm
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    if height_cm.is_nan() || height_cm.is_infinite() {
        return Err("Height must be a valid number".to_string());
    }
    if height_cm < 50.0 {
        return Err("Height must be at least 50 cm".to_string());
    }
    if height_cm > 300.0 {
        return Err("Height must be at most 300 cm".to_string());
    }
    Ok(())
}

/// Validate body weight value (in kg)
pub fn validate_body_weight_kg(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate date of birth is not in the future
pub fn validate_date_of_birth(dob: NaiveDate) -> Result<(), String> {
    let today = chrono::Utc::now().date_naive();
    if dob > today {
        return Err("Date of birth cannot be in the future".to_string());
    }
    Ok(())
}

/// Validate that a counter-like field (sets, reps, seconds, calories) is not negative
pub fn validate_non_negative(field: &str, value: i32) -> Result<(), String> {
    if value < 0 {
        return Err(format!("{} cannot be negative", field));
    }
    Ok(())
}

/// Validate that a measured quantity (load, goal value) is a finite, non-negative number
pub fn validate_non_negative_f64(field: &str, value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err(format!("{} must be a valid number", field));
    }
    if value < 0.0 {
        return Err(format!("{} cannot be negative", field));
    }
    Ok(())
}

/// Validate duration in minutes
pub fn validate_duration_minutes(minutes: i32) -> Result<(), String> {
    if minutes < 0 {
        return Err("Duration cannot be negative".to_string());
    }
    if minutes > 1440 {
        // 24 hours
        return Err("Duration cannot exceed 24 hours".to_string());
    }
    Ok(())
}

/// Validate that a workout does not end before it starts
pub fn validate_time_range(start: NaiveDateTime, end: NaiveDateTime) -> Result<(), String> {
    if end < start {
        return Err("End time cannot be before start time".to_string());
    }
    Ok(())
}

/// Validate that a goal's target date does not precede its start date
pub fn validate_date_range(start: NaiveDate, target: NaiveDate) -> Result<(), String> {
    if target < start {
        return Err("Target date cannot be before start date".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("alice")]
    #[case("bob_smith")]
    #[case("j.doe-99")]
    fn test_valid_usernames(#[case] username: &str) {
        assert!(validate_username(username).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("ab")]
    #[case("has space")]
    #[case("emoji🙂")]
    fn test_invalid_usernames(#[case] username: &str) {
        assert!(validate_username(username).is_err());
    }

    #[test]
    fn test_username_too_long() {
        assert!(validate_username(&"a".repeat(51)).is_err());
        assert!(validate_username(&"a".repeat(50)).is_ok());
    }

    #[rstest]
    #[case("a@x.com")]
    #[case("user.name+tag@example.co.uk")]
    fn test_valid_emails(#[case] email: &str) {
        assert!(validate_email(email).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("not-an-email")]
    #[case("@example.com")]
    #[case("user@")]
    fn test_invalid_emails(#[case] email: &str) {
        assert!(validate_email(email).is_err());
    }

    #[test]
    fn test_short_passwords_are_accepted() {
        assert!(validate_password("pw").is_ok());
        assert!(validate_password("  ").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_height_bounds() {
        assert!(validate_height_cm(50.0).is_ok());
        assert!(validate_height_cm(300.0).is_ok());
        assert!(validate_height_cm(49.9).is_err());
        assert!(validate_height_cm(f64::NAN).is_err());
    }

    #[test]
    fn test_body_weight_bounds() {
        assert!(validate_body_weight_kg(70.0).is_ok());
        assert!(validate_body_weight_kg(19.0).is_err());
        assert!(validate_body_weight_kg(501.0).is_err());
    }

    #[test]
    fn test_future_date_of_birth_rejected() {
        let tomorrow = chrono::Utc::now().date_naive() + chrono::Duration::days(1);
        assert!(validate_date_of_birth(tomorrow).is_err());
        let dob = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        assert!(validate_date_of_birth(dob).is_ok());
    }

    #[test]
    fn test_time_range() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let end = start + chrono::Duration::minutes(45);
        assert!(validate_time_range(start, end).is_ok());
        assert!(validate_time_range(start, start).is_ok());
        assert!(validate_time_range(end, start).is_err());
    }

    proptest! {
        #[test]
        fn prop_non_negative_counters_accepted(value in 0i32..100_000) {
            prop_assert!(validate_non_negative("Sets", value).is_ok());
        }

        #[test]
        fn prop_negative_counters_rejected(value in i32::MIN..0) {
            let err = validate_non_negative("Reps", value).unwrap_err();
            prop_assert!(err.starts_with("Reps"));
        }

        #[test]
        fn prop_duration_within_a_day_accepted(minutes in 0i32..=1440) {
            prop_assert!(validate_duration_minutes(minutes).is_ok());
        }
    }
}
