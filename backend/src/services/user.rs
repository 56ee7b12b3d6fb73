//! User service for profile management
//!
//! Passwords are hashed on the blocking thread pool and never leave this
//! module in any form. Onboarding goals sent with a new user are stored in
//! the same unit of work as the user.

use crate::error::ApiError;
use crate::mappers::UserMapper;
use crate::password::PasswordService;
use crate::metrics;
use crate::repositories::{GoalRecord, Repositories, UserRecord};
use chrono::{Months, NaiveDate, Utc};
use fitness_tracker_shared::types::{CreateUserRequest, OnboardingGoal, UpdateUserRequest, UserDto};
use fitness_tracker_shared::{validation, FitnessLevel, GoalStatus};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashSet;
use tracing::info;

/// Onboarding goals are tracked as percentages of the way there
const ONBOARDING_TARGET_VALUE: f64 = 100.0;
const ONBOARDING_UNIT: &str = "%";
const ONBOARDING_HORIZON_MONTHS: u32 = 3;

/// Optional profile fields shared by create and update requests
struct Profile {
    first_name: Option<String>,
    last_name: Option<String>,
    date_of_birth: Option<NaiveDate>,
    gender: Option<String>,
    height: Option<f64>,
    weight: Option<f64>,
    fitness_level: Option<String>,
}

impl Profile {
    fn validated(
        first_name: Option<String>,
        last_name: Option<String>,
        date_of_birth: Option<NaiveDate>,
        gender: Option<String>,
        height: Option<f64>,
        weight: Option<f64>,
        fitness_level: Option<String>,
    ) -> Result<Self, ApiError> {
        if let Some(height) = height {
            validation::validate_height_cm(height).map_err(ApiError::Validation)?;
        }
        if let Some(weight) = weight {
            validation::validate_body_weight_kg(weight).map_err(ApiError::Validation)?;
        }
        if let Some(dob) = date_of_birth {
            validation::validate_date_of_birth(dob).map_err(ApiError::Validation)?;
        }
        let fitness_level = match fitness_level.as_deref().map(str::trim) {
            Some(level) if !level.is_empty() => Some(
                level
                    .parse::<FitnessLevel>()
                    .map_err(|e| ApiError::Validation(e.to_string()))?
                    .as_str()
                    .to_string(),
            ),
            _ => None,
        };

        Ok(Self {
            first_name,
            last_name,
            date_of_birth,
            gender,
            height,
            weight,
            fitness_level,
        })
    }
}

/// User service for account and profile operations
pub struct UserService;

impl UserService {
    pub async fn get_all_users(repos: &Repositories) -> Result<Vec<UserDto>, ApiError> {
        let users = repos.users.find_all().await.map_err(ApiError::Internal)?;

        let mut views = Vec::with_capacity(users.len());
        for user in &users {
            views.push(Self::view(repos, user).await?);
        }
        Ok(views)
    }

    pub async fn get_user(repos: &Repositories, id: i64) -> Result<UserDto, ApiError> {
        let user = repos
            .users
            .find_by_id(id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("User not found with id: {}", id)))?;
        Self::view(repos, &user).await
    }

    pub async fn get_user_by_username(
        repos: &Repositories,
        username: &str,
    ) -> Result<UserDto, ApiError> {
        let user = repos
            .users
            .find_by_username(username)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| {
                ApiError::NotFound(format!("User not found with username: {}", username))
            })?;
        Self::view(repos, &user).await
    }

    pub async fn get_user_by_email(repos: &Repositories, email: &str) -> Result<UserDto, ApiError> {
        let user = repos
            .users
            .find_by_email(email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("User not found with email: {}", email)))?;
        Self::view(repos, &user).await
    }

    /// Register a user, plus any onboarding goals
    ///
    /// Everything is validated before the first write, so a rejected request
    /// stores nothing.
    pub async fn create_user(
        repos: &Repositories,
        request: CreateUserRequest,
    ) -> Result<UserDto, ApiError> {
        let username = request
            .username
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        validation::validate_username(&username).map_err(ApiError::Validation)?;

        let email = request
            .email
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        validation::validate_email(&email).map_err(ApiError::Validation)?;

        let password = request
            .password
            .ok_or_else(|| ApiError::Validation("Password is required".to_string()))?;
        validation::validate_password(password.expose_secret()).map_err(ApiError::Validation)?;

        let profile = Profile::validated(
            request.first_name,
            request.last_name,
            request.date_of_birth,
            request.gender,
            request.height,
            request.weight,
            request.fitness_level,
        )?;
        let onboarding = onboarding_goals(request.goals.unwrap_or_default())?;

        Self::ensure_username_free(repos, &username, None).await?;
        Self::ensure_email_free(repos, &email, None).await?;

        let password_hash = PasswordService::hash_async(password)
            .await
            .map_err(ApiError::Internal)?;

        let record = UserRecord {
            id: 0,
            username,
            email,
            password_hash,
            first_name: profile.first_name,
            last_name: profile.last_name,
            date_of_birth: profile.date_of_birth,
            gender: profile.gender,
            height: profile.height,
            weight: profile.weight,
            fitness_level: profile.fitness_level,
        };

        let today = Utc::now().date_naive();
        let goals: Vec<GoalRecord> = onboarding
            .into_iter()
            .map(|entry| GoalRecord {
                id: 0,
                user_id: None,
                title: entry.goal.unwrap_or_default(),
                description: entry.metric,
                start_date: Some(today),
                target_date: today.checked_add_months(Months::new(ONBOARDING_HORIZON_MONTHS)),
                status: GoalStatus::Active.as_str().to_string(),
                category: entry.category,
                target_value: Some(ONBOARDING_TARGET_VALUE),
                unit: Some(ONBOARDING_UNIT.to_string()),
                current_value: Some(0.0),
            })
            .collect();

        let (user, goals) = repos
            .users
            .insert_with_goals(&record, &goals)
            .await
            .map_err(ApiError::Internal)?;
        for _ in &goals {
            metrics::record_goal_created();
        }
        info!(
            user_id = user.id,
            username = %user.username,
            goals = goals.len(),
            "User created"
        );

        Self::view(repos, &user).await
    }

    /// Update a profile
    ///
    /// Blank username/email keep the stored values; the password is only
    /// re-hashed when a non-blank one is supplied. Profile fields are
    /// overwritten.
    pub async fn update_user(
        repos: &Repositories,
        id: i64,
        request: UpdateUserRequest,
    ) -> Result<UserDto, ApiError> {
        let existing = repos
            .users
            .find_by_id(id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("User not found with id: {}", id)))?;

        let username = match non_blank(request.username.as_deref()) {
            Some(username) => {
                validation::validate_username(username).map_err(ApiError::Validation)?;
                username.to_string()
            }
            None => existing.username.clone(),
        };
        let email = match non_blank(request.email.as_deref()) {
            Some(email) => {
                validation::validate_email(email).map_err(ApiError::Validation)?;
                email.to_string()
            }
            None => existing.email.clone(),
        };
        let password: Option<SecretString> = request
            .password
            .filter(|p| !p.expose_secret().trim().is_empty());
        if let Some(password) = &password {
            validation::validate_password(password.expose_secret())
                .map_err(ApiError::Validation)?;
        }

        let profile = Profile::validated(
            request.first_name,
            request.last_name,
            request.date_of_birth,
            request.gender,
            request.height,
            request.weight,
            request.fitness_level,
        )?;

        if username != existing.username {
            Self::ensure_username_free(repos, &username, Some(id)).await?;
        }
        if email != existing.email {
            Self::ensure_email_free(repos, &email, Some(id)).await?;
        }

        let password_hash = match password {
            Some(password) => PasswordService::hash_async(password)
                .await
                .map_err(ApiError::Internal)?,
            None => existing.password_hash,
        };

        let record = UserRecord {
            id,
            username,
            email,
            password_hash,
            first_name: profile.first_name,
            last_name: profile.last_name,
            date_of_birth: profile.date_of_birth,
            gender: profile.gender,
            height: profile.height,
            weight: profile.weight,
            fitness_level: profile.fitness_level,
        };
        let user = repos
            .users
            .update(&record)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("User not found with id: {}", id)))?;

        Self::view(repos, &user).await
    }

    /// Delete a user with their workouts and goals
    pub async fn delete_user(repos: &Repositories, id: i64) -> Result<(), ApiError> {
        let deleted = repos.users.delete(id).await.map_err(ApiError::Internal)?;
        if !deleted {
            return Err(ApiError::NotFound(format!("User not found with id: {}", id)));
        }

        info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn ensure_username_free(
        repos: &Repositories,
        username: &str,
        owner: Option<i64>,
    ) -> Result<(), ApiError> {
        let holder = repos
            .users
            .find_by_username(username)
            .await
            .map_err(ApiError::Internal)?;
        match holder {
            Some(user) if Some(user.id) != owner => {
                Err(ApiError::BadRequest("Username already exists".to_string()))
            }
            _ => Ok(()),
        }
    }

    async fn ensure_email_free(
        repos: &Repositories,
        email: &str,
        owner: Option<i64>,
    ) -> Result<(), ApiError> {
        let holder = repos
            .users
            .find_by_email(email)
            .await
            .map_err(ApiError::Internal)?;
        match holder {
            Some(user) if Some(user.id) != owner => {
                Err(ApiError::BadRequest("Email already exists".to_string()))
            }
            _ => Ok(()),
        }
    }

    async fn view(repos: &Repositories, user: &UserRecord) -> Result<UserDto, ApiError> {
        let workouts = repos
            .workouts
            .find_by_user_id(user.id)
            .await
            .map_err(ApiError::Internal)?;
        let goals = repos
            .goals
            .find_by_user_id(user.id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(UserMapper::to_dto(user, &workouts, &goals))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Trim titles, reject blanks and drop case-insensitive repeats
fn onboarding_goals(entries: Vec<OnboardingGoal>) -> Result<Vec<OnboardingGoal>, ApiError> {
    let mut seen = HashSet::new();
    let mut goals = Vec::with_capacity(entries.len());

    for entry in entries {
        let title = non_blank(entry.goal.as_deref())
            .ok_or_else(|| ApiError::Validation("Onboarding goal title is required".to_string()))?
            .to_string();
        if seen.insert(title.to_lowercase()) {
            goals.push(OnboardingGoal {
                goal: Some(title),
                ..entry
            });
        }
    }

    Ok(goals)
}
