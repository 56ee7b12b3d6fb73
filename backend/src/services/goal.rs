//! Goal service
//!
//! Provides business logic for:
//! - Goal creation with the one-active-goal-per-title rule
//! - Updates that keep existing title/status when the new ones are blank
//! - Progress updates with automatic completion

use crate::error::ApiError;
use crate::mappers::GoalMapper;
use crate::metrics;
use crate::repositories::{GoalRecord, Repositories};
use fitness_tracker_shared::{types::GoalDto, validation, GoalStatus};
use tracing::{info, warn};

const DUPLICATE_ACTIVE_GOAL: &str = "An active goal with this title already exists for this user";

/// Goal service for business logic
pub struct GoalService;

impl GoalService {
    pub async fn get_all_goals(repos: &Repositories) -> Result<Vec<GoalDto>, ApiError> {
        let records = repos.goals.find_all().await.map_err(ApiError::Internal)?;
        Ok(records.iter().map(GoalMapper::to_dto).collect())
    }

    pub async fn get_goal(repos: &Repositories, id: i64) -> Result<GoalDto, ApiError> {
        let record = Self::find_goal(repos, id).await?;
        Ok(GoalMapper::to_dto(&record))
    }

    pub async fn get_goals_by_user(
        repos: &Repositories,
        user_id: i64,
    ) -> Result<Vec<GoalDto>, ApiError> {
        let records = repos
            .goals
            .find_by_user_id(user_id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(records.iter().map(GoalMapper::to_dto).collect())
    }

    /// Status is matched ignoring case
    pub async fn get_goals_by_user_and_status(
        repos: &Repositories,
        user_id: i64,
        status: &str,
    ) -> Result<Vec<GoalDto>, ApiError> {
        let records = repos
            .goals
            .find_by_user_id_and_status(user_id, status.trim())
            .await
            .map_err(ApiError::Internal)?;
        Ok(records.iter().map(GoalMapper::to_dto).collect())
    }

    pub async fn get_goals_by_user_and_category(
        repos: &Repositories,
        user_id: i64,
        category: &str,
    ) -> Result<Vec<GoalDto>, ApiError> {
        let records = repos
            .goals
            .find_by_user_id_and_category(user_id, category)
            .await
            .map_err(ApiError::Internal)?;
        Ok(records.iter().map(GoalMapper::to_dto).collect())
    }

    /// Create a goal
    ///
    /// The title is trimmed and a blank status becomes "active". An owned
    /// goal is refused with a conflict while the owner already has an active
    /// goal with the same title (ignoring case).
    pub async fn create_goal(repos: &Repositories, dto: GoalDto) -> Result<GoalDto, ApiError> {
        let title = dto
            .title
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if title.is_empty() {
            return Err(ApiError::Validation("Goal title is required".to_string()));
        }
        let status = match non_blank(dto.status.as_deref()) {
            Some(raw) => parse_status(raw)?,
            None => GoalStatus::Active,
        };
        validate_goal_values(&dto)?;

        if let Some(user_id) = dto.user_id {
            let duplicate = repos
                .goals
                .exists_by_user_status_title(user_id, GoalStatus::Active.as_str(), &title)
                .await
                .map_err(ApiError::Internal)?;
            if duplicate {
                warn!(user_id, title = %title, "Rejected duplicate active goal");
                metrics::record_goal_conflict();
                return Err(ApiError::Conflict(DUPLICATE_ACTIVE_GOAL.to_string()));
            }

            let user_exists = repos
                .users
                .exists_by_id(user_id)
                .await
                .map_err(ApiError::Internal)?;
            if !user_exists {
                return Err(ApiError::NotFound(format!("User not found with id: {}", user_id)));
            }
        }

        let record = GoalRecord {
            title,
            status: status.as_str().to_string(),
            current_value: dto.current_value.or(Some(0.0)),
            ..GoalMapper::to_entity(&dto)
        };
        let saved = repos.goals.insert(&record).await.map_err(ApiError::Internal)?;

        info!(goal_id = saved.id, user_id = ?saved.user_id, "Goal created");
        metrics::record_goal_created();

        Ok(GoalMapper::to_dto(&saved))
    }

    /// Update a goal
    ///
    /// Title and status keep their stored values when the new ones are blank
    /// or absent; every other field is overwritten.
    pub async fn update_goal(
        repos: &Repositories,
        id: i64,
        dto: GoalDto,
    ) -> Result<GoalDto, ApiError> {
        let existing = Self::find_goal(repos, id).await?;

        let title = non_blank(dto.title.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| existing.title.clone());
        let status = match non_blank(dto.status.as_deref()) {
            Some(raw) => parse_status(raw)?.as_str().to_string(),
            None => existing.status.clone(),
        };
        validate_goal_values(&dto)?;

        if let Some(user_id) = existing.user_id {
            if !title.is_empty() && GoalStatus::is_active(&status) {
                let duplicate = repos
                    .goals
                    .exists_by_user_status_title_excluding(
                        user_id,
                        GoalStatus::Active.as_str(),
                        &title,
                        id,
                    )
                    .await
                    .map_err(ApiError::Internal)?;
                if duplicate {
                    warn!(goal_id = id, user_id, title = %title, "Rejected duplicate active goal");
                    metrics::record_goal_conflict();
                    return Err(ApiError::Conflict(DUPLICATE_ACTIVE_GOAL.to_string()));
                }
            }
        }

        let record = GoalRecord {
            id,
            user_id: existing.user_id,
            title,
            description: dto.description,
            start_date: dto.start_date,
            target_date: dto.target_date,
            status,
            category: dto.category,
            target_value: dto.target_value,
            unit: dto.unit,
            current_value: dto.current_value,
        };
        let saved = repos
            .goals
            .update(&record)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("Goal not found with id: {}", id)))?;

        Ok(GoalMapper::to_dto(&saved))
    }

    /// Record progress; reaching the target completes the goal
    pub async fn update_progress(
        repos: &Repositories,
        id: i64,
        current_value: f64,
    ) -> Result<GoalDto, ApiError> {
        let mut goal = Self::find_goal(repos, id).await?;

        goal.current_value = Some(current_value);
        if let Some(target) = goal.target_value {
            if current_value >= target {
                if goal.status != GoalStatus::Completed.as_str() {
                    info!(goal_id = id, "Goal completed");
                    metrics::record_goal_completed();
                }
                goal.status = GoalStatus::Completed.as_str().to_string();
            }
        }

        let saved = repos
            .goals
            .update(&goal)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("Goal not found with id: {}", id)))?;

        Ok(GoalMapper::to_dto(&saved))
    }

    pub async fn delete_goal(repos: &Repositories, id: i64) -> Result<(), ApiError> {
        let deleted = repos.goals.delete(id).await.map_err(ApiError::Internal)?;
        if !deleted {
            return Err(ApiError::NotFound(format!("Goal not found with id: {}", id)));
        }

        info!(goal_id = id, "Goal deleted");
        Ok(())
    }

    async fn find_goal(repos: &Repositories, id: i64) -> Result<GoalRecord, ApiError> {
        repos
            .goals
            .find_by_id(id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("Goal not found with id: {}", id)))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_status(raw: &str) -> Result<GoalStatus, ApiError> {
    raw.parse::<GoalStatus>()
        .map_err(|e| ApiError::Validation(e.to_string()))
}

fn validate_goal_values(dto: &GoalDto) -> Result<(), ApiError> {
    if let (Some(start), Some(target)) = (dto.start_date, dto.target_date) {
        validation::validate_date_range(start, target).map_err(ApiError::Validation)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::UserRecord;

    async fn seed_user(repos: &Repositories, username: &str) -> i64 {
        repos
            .users
            .insert(&UserRecord {
                id: 0,
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash: "$argon2id$stub".to_string(),
                first_name: None,
                last_name: None,
                date_of_birth: None,
                gender: None,
                height: None,
                weight: None,
                fitness_level: None,
            })
            .await
            .unwrap()
            .id
    }

    fn goal(user_id: Option<i64>, title: &str) -> GoalDto {
        GoalDto {
            title: Some(title.to_string()),
            user_id,
            target_value: Some(100.0),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_trims_title_and_defaults() {
        let repos = Repositories::in_memory();
        let user_id = seed_user(&repos, "alice").await;

        let created = GoalService::create_goal(&repos, goal(Some(user_id), "  Run 5k  "))
            .await
            .unwrap();

        assert_eq!(created.title.as_deref(), Some("Run 5k"));
        assert_eq!(created.status.as_deref(), Some("active"));
        assert_eq!(created.current_value, Some(0.0));
        assert!(created.id.is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_case_variant_duplicate() {
        let repos = Repositories::in_memory();
        let user_id = seed_user(&repos, "alice").await;
        GoalService::create_goal(&repos, goal(Some(user_id), "Run 5k"))
            .await
            .unwrap();

        let err = GoalService::create_goal(&repos, goal(Some(user_id), "RUN 5K"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(repos.goals.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_title_allowed_for_other_user() {
        let repos = Repositories::in_memory();
        let alice = seed_user(&repos, "alice").await;
        let bob = seed_user(&repos, "bob").await;

        GoalService::create_goal(&repos, goal(Some(alice), "Run 5k")).await.unwrap();
        assert!(GoalService::create_goal(&repos, goal(Some(bob), "Run 5k")).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_allowed_after_cancel() {
        let repos = Repositories::in_memory();
        let user_id = seed_user(&repos, "alice").await;
        let first = GoalService::create_goal(&repos, goal(Some(user_id), "Run 5k"))
            .await
            .unwrap();

        let cancel = GoalDto {
            status: Some("Cancelled".to_string()),
            ..Default::default()
        };
        let cancelled = GoalService::update_goal(&repos, first.id.unwrap(), cancel)
            .await
            .unwrap();
        assert_eq!(cancelled.status.as_deref(), Some("cancelled"));

        assert!(GoalService::create_goal(&repos, goal(Some(user_id), "Run 5k")).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_for_missing_user_is_not_found() {
        let repos = Repositories::in_memory();
        let err = GoalService::create_goal(&repos, goal(Some(404), "Run 5k"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unowned_goals_skip_duplicate_rule() {
        let repos = Repositories::in_memory();
        GoalService::create_goal(&repos, goal(None, "Stretch")).await.unwrap();
        assert!(GoalService::create_goal(&repos, goal(None, "Stretch")).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_validates_title_and_status() {
        let repos = Repositories::in_memory();

        let blank = GoalService::create_goal(&repos, goal(None, "   ")).await.unwrap_err();
        assert!(matches!(blank, ApiError::Validation(_)));

        let bad_status = GoalDto {
            status: Some("abandoned".to_string()),
            ..goal(None, "Run 5k")
        };
        let err = GoalService::create_goal(&repos, bad_status).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_blank_title_and_status_keep_existing() {
        let repos = Repositories::in_memory();
        let user_id = seed_user(&repos, "alice").await;
        let created = GoalService::create_goal(&repos, goal(Some(user_id), "Run 5k"))
            .await
            .unwrap();

        let patch = GoalDto {
            title: Some("   ".to_string()),
            status: Some("".to_string()),
            unit: Some("km".to_string()),
            ..Default::default()
        };
        let updated = GoalService::update_goal(&repos, created.id.unwrap(), patch)
            .await
            .unwrap();

        assert_eq!(updated.title.as_deref(), Some("Run 5k"));
        assert_eq!(updated.status.as_deref(), Some("active"));
        assert_eq!(updated.unit.as_deref(), Some("km"));
        assert_eq!(updated.user_id, Some(user_id));
    }

    #[tokio::test]
    async fn test_update_conflict_ignores_own_goal() {
        let repos = Repositories::in_memory();
        let user_id = seed_user(&repos, "alice").await;
        let run = GoalService::create_goal(&repos, goal(Some(user_id), "Run 5k"))
            .await
            .unwrap();
        let swim = GoalService::create_goal(&repos, goal(Some(user_id), "Swim 1k"))
            .await
            .unwrap();

        // Renaming to its own title is fine
        let same = GoalService::update_goal(&repos, run.id.unwrap(), goal(None, "run 5K")).await;
        assert!(same.is_ok());

        let err = GoalService::update_goal(&repos, swim.id.unwrap(), goal(None, "Run 5k"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_progress_completes_at_target() {
        let repos = Repositories::in_memory();
        let user_id = seed_user(&repos, "alice").await;
        let created = GoalService::create_goal(&repos, goal(Some(user_id), "Run 5k"))
            .await
            .unwrap();
        let id = created.id.unwrap();

        let partial = GoalService::update_progress(&repos, id, 99.0).await.unwrap();
        assert_eq!(partial.status.as_deref(), Some("active"));
        assert_eq!(partial.current_value, Some(99.0));

        let done = GoalService::update_progress(&repos, id, 100.0).await.unwrap();
        assert_eq!(done.status.as_deref(), Some("completed"));
    }

    #[tokio::test]
    async fn test_progress_without_target_keeps_status() {
        let repos = Repositories::in_memory();
        let created = GoalService::create_goal(
            &repos,
            GoalDto {
                target_value: None,
                status: Some("paused".to_string()),
                ..goal(None, "Meditate")
            },
        )
        .await
        .unwrap();

        let updated = GoalService::update_progress(&repos, created.id.unwrap(), 1_000.0)
            .await
            .unwrap();
        assert_eq!(updated.status.as_deref(), Some("paused"));
    }

    #[tokio::test]
    async fn test_missing_goal_is_not_found() {
        let repos = Repositories::in_memory();

        assert!(matches!(
            GoalService::delete_goal(&repos, 1).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            GoalService::update_progress(&repos, 1, 5.0).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            GoalService::update_goal(&repos, 1, goal(None, "x")).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_status_query_ignores_case() {
        let repos = Repositories::in_memory();
        let user_id = seed_user(&repos, "alice").await;
        GoalService::create_goal(&repos, goal(Some(user_id), "Run 5k")).await.unwrap();

        let found = GoalService::get_goals_by_user_and_status(&repos, user_id, "ACTIVE")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }
}
