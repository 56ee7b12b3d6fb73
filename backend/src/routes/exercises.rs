//! Exercise API routes addressed by exercise id

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::services::ExerciseService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use fitness_tracker_shared::types::ExerciseDto;

pub fn exercise_routes() -> Router<AppState> {
    Router::new().route(
        "/:id",
        get(get_exercise).put(update_exercise).delete(delete_exercise),
    )
}

/// GET /api/exercises/:id
async fn get_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ExerciseDto>> {
    Ok(Json(ExerciseService::get_exercise(state.repos(), id).await?))
}

/// PUT /api/exercises/:id
async fn update_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(dto): ApiJson<ExerciseDto>,
) -> ApiResult<Json<ExerciseDto>> {
    Ok(Json(
        ExerciseService::update_exercise(state.repos(), id, dto).await?,
    ))
}

/// DELETE /api/exercises/:id
async fn delete_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    ExerciseService::delete_exercise(state.repos(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
