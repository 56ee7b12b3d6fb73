//! Workout API routes, including the exercises nested under a workout

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::services::{ExerciseService, WorkoutService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use fitness_tracker_shared::types::{ExerciseDto, WorkoutDto, WorkoutRangeQuery};

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_workouts).post(create_workout))
        .route(
            "/:id",
            get(get_workout).put(update_workout).delete(delete_workout),
        )
        .route("/:id/exercises", get(list_exercises).post(create_exercise))
        .route("/user/:user_id", get(get_workouts_by_user))
        .route("/user/:user_id/type/:workout_type", get(get_workouts_by_type))
        .route("/user/:user_id/range", get(get_workouts_in_range))
}

/// GET /api/workouts
async fn list_workouts(State(state): State<AppState>) -> ApiResult<Json<Vec<WorkoutDto>>> {
    Ok(Json(WorkoutService::get_all_workouts(state.repos()).await?))
}

/// GET /api/workouts/:id
async fn get_workout(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<WorkoutDto>> {
    Ok(Json(WorkoutService::get_workout(state.repos(), id).await?))
}

/// GET /api/workouts/user/:user_id
async fn get_workouts_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<WorkoutDto>>> {
    Ok(Json(
        WorkoutService::get_workouts_by_user(state.repos(), user_id).await?,
    ))
}

/// GET /api/workouts/user/:user_id/type/:workout_type
async fn get_workouts_by_type(
    State(state): State<AppState>,
    Path((user_id, workout_type)): Path<(i64, String)>,
) -> ApiResult<Json<Vec<WorkoutDto>>> {
    Ok(Json(
        WorkoutService::get_workouts_by_user_and_type(state.repos(), user_id, &workout_type)
            .await?,
    ))
}

/// GET /api/workouts/user/:user_id/range?start=..&end=..
async fn get_workouts_in_range(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(range): Query<WorkoutRangeQuery>,
) -> ApiResult<Json<Vec<WorkoutDto>>> {
    Ok(Json(
        WorkoutService::get_workouts_by_user_in_range(
            state.repos(),
            user_id,
            range.start,
            range.end,
        )
        .await?,
    ))
}

/// POST /api/workouts
async fn create_workout(
    State(state): State<AppState>,
    ApiJson(dto): ApiJson<WorkoutDto>,
) -> ApiResult<Json<WorkoutDto>> {
    Ok(Json(WorkoutService::create_workout(state.repos(), dto).await?))
}

/// PUT /api/workouts/:id
async fn update_workout(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(dto): ApiJson<WorkoutDto>,
) -> ApiResult<Json<WorkoutDto>> {
    Ok(Json(
        WorkoutService::update_workout(state.repos(), id, dto).await?,
    ))
}

/// DELETE /api/workouts/:id
async fn delete_workout(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    WorkoutService::delete_workout(state.repos(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/workouts/:id/exercises
async fn list_exercises(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<ExerciseDto>>> {
    Ok(Json(
        ExerciseService::get_exercises_for_workout(state.repos(), id).await?,
    ))
}

/// POST /api/workouts/:id/exercises
async fn create_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(dto): ApiJson<ExerciseDto>,
) -> ApiResult<Json<ExerciseDto>> {
    Ok(Json(
        ExerciseService::create_exercise(state.repos(), id, dto).await?,
    ))
}
