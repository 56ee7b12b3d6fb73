//! Goal API routes

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::services::GoalService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use fitness_tracker_shared::types::{GoalDto, GoalProgressRequest};

pub fn goal_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_goals).post(create_goal))
        .route("/:id", get(get_goal).put(update_goal).delete(delete_goal))
        .route("/:id/progress", patch(update_progress))
        .route("/user/:user_id", get(get_goals_by_user))
        .route("/user/:user_id/status/:status", get(get_goals_by_status))
        .route("/user/:user_id/category/:category", get(get_goals_by_category))
}

/// GET /api/goals
async fn list_goals(State(state): State<AppState>) -> ApiResult<Json<Vec<GoalDto>>> {
    Ok(Json(GoalService::get_all_goals(state.repos()).await?))
}

/// GET /api/goals/:id
async fn get_goal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<GoalDto>> {
    Ok(Json(GoalService::get_goal(state.repos(), id).await?))
}

/// GET /api/goals/user/:user_id
async fn get_goals_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<GoalDto>>> {
    Ok(Json(GoalService::get_goals_by_user(state.repos(), user_id).await?))
}

/// GET /api/goals/user/:user_id/status/:status
async fn get_goals_by_status(
    State(state): State<AppState>,
    Path((user_id, status)): Path<(i64, String)>,
) -> ApiResult<Json<Vec<GoalDto>>> {
    Ok(Json(
        GoalService::get_goals_by_user_and_status(state.repos(), user_id, &status).await?,
    ))
}

/// GET /api/goals/user/:user_id/category/:category
async fn get_goals_by_category(
    State(state): State<AppState>,
    Path((user_id, category)): Path<(i64, String)>,
) -> ApiResult<Json<Vec<GoalDto>>> {
    Ok(Json(
        GoalService::get_goals_by_user_and_category(state.repos(), user_id, &category).await?,
    ))
}

/// POST /api/goals
///
/// Returns 409 when the user already has an active goal with this title.
async fn create_goal(
    State(state): State<AppState>,
    ApiJson(dto): ApiJson<GoalDto>,
) -> ApiResult<Json<GoalDto>> {
    Ok(Json(GoalService::create_goal(state.repos(), dto).await?))
}

/// PUT /api/goals/:id
async fn update_goal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(dto): ApiJson<GoalDto>,
) -> ApiResult<Json<GoalDto>> {
    Ok(Json(GoalService::update_goal(state.repos(), id, dto).await?))
}

/// PATCH /api/goals/:id/progress
async fn update_progress(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<GoalProgressRequest>,
) -> ApiResult<Json<GoalDto>> {
    Ok(Json(
        GoalService::update_progress(state.repos(), id, req.current_value).await?,
    ))
}

/// DELETE /api/goals/:id
async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    GoalService::delete_goal(state.repos(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
