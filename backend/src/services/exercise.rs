//! Exercise service

use crate::error::ApiError;
use crate::mappers::ExerciseMapper;
use crate::repositories::{ExerciseRecord, Repositories};
use crate::services::WorkoutService;
use fitness_tracker_shared::{types::ExerciseDto, validation};

/// Exercise service for business logic
pub struct ExerciseService;

impl ExerciseService {
    pub async fn get_exercises_for_workout(
        repos: &Repositories,
        workout_id: i64,
    ) -> Result<Vec<ExerciseDto>, ApiError> {
        WorkoutService::find_workout(repos, workout_id).await?;

        let records = repos
            .exercises
            .find_by_workout_id(workout_id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(records.iter().map(ExerciseMapper::to_dto).collect())
    }

    pub async fn get_exercise(repos: &Repositories, id: i64) -> Result<ExerciseDto, ApiError> {
        let record = Self::find_exercise(repos, id).await?;
        Ok(ExerciseMapper::to_dto(&record))
    }

    /// Create an exercise under `workout_id`, ignoring any workout id in the body
    pub async fn create_exercise(
        repos: &Repositories,
        workout_id: i64,
        dto: ExerciseDto,
    ) -> Result<ExerciseDto, ApiError> {
        let record = Self::new_record(workout_id, &dto)?;
        WorkoutService::find_workout(repos, workout_id).await?;

        let saved = repos
            .exercises
            .insert(&record)
            .await
            .map_err(ApiError::Internal)?;

        Ok(ExerciseMapper::to_dto(&saved))
    }

    pub async fn update_exercise(
        repos: &Repositories,
        id: i64,
        dto: ExerciseDto,
    ) -> Result<ExerciseDto, ApiError> {
        let existing = Self::find_exercise(repos, id).await?;
        validate_amounts(&dto)?;

        let name = dto
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or(existing.name);
        let record = ExerciseRecord {
            id,
            workout_id: existing.workout_id,
            name,
            ..ExerciseMapper::to_entity(&dto)
        };

        let saved = repos
            .exercises
            .update(&record)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("Exercise not found with id: {}", id)))?;

        Ok(ExerciseMapper::to_dto(&saved))
    }

    pub async fn delete_exercise(repos: &Repositories, id: i64) -> Result<(), ApiError> {
        let deleted = repos.exercises.delete(id).await.map_err(ApiError::Internal)?;
        if !deleted {
            return Err(ApiError::NotFound(format!("Exercise not found with id: {}", id)));
        }
        Ok(())
    }

    /// Validated record for a new exercise under `workout_id`; storage is
    /// not touched
    pub(crate) fn new_record(
        workout_id: i64,
        dto: &ExerciseDto,
    ) -> Result<ExerciseRecord, ApiError> {
        let name = dto
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ApiError::Validation("Exercise name is required".to_string()))?;
        validate_amounts(dto)?;

        Ok(ExerciseRecord {
            workout_id,
            name: name.to_string(),
            ..ExerciseMapper::to_entity(dto)
        })
    }

    async fn find_exercise(repos: &Repositories, id: i64) -> Result<ExerciseRecord, ApiError> {
        repos
            .exercises
            .find_by_id(id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("Exercise not found with id: {}", id)))
    }
}

fn validate_amounts(dto: &ExerciseDto) -> Result<(), ApiError> {
    let counts = [
        ("sets", dto.sets),
        ("reps", dto.reps),
        ("duration", dto.duration),
        ("restTime", dto.rest_time),
    ];
    for (field, value) in counts {
        if let Some(value) = value {
            validation::validate_non_negative(field, value).map_err(ApiError::Validation)?;
        }
    }
    if let Some(weight) = dto.weight {
        validation::validate_non_negative_f64("weight", weight).map_err(ApiError::Validation)?;
    }
    Ok(())
}
