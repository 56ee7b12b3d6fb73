//! User API routes

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use fitness_tracker_shared::types::{CreateUserRequest, UpdateUserRequest, UserDto};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/username/:username", get(get_user_by_username))
        .route("/email/:email", get(get_user_by_email))
}

/// GET /api/users
async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserDto>>> {
    Ok(Json(UserService::get_all_users(state.repos()).await?))
}

/// GET /api/users/:id
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserDto>> {
    Ok(Json(UserService::get_user(state.repos(), id).await?))
}

/// GET /api/users/username/:username
async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<UserDto>> {
    Ok(Json(
        UserService::get_user_by_username(state.repos(), &username).await?,
    ))
}

/// GET /api/users/email/:email
async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<UserDto>> {
    Ok(Json(UserService::get_user_by_email(state.repos(), &email).await?))
}

/// POST /api/users
///
/// Accepts an optional `goals` array of onboarding goals.
async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> ApiResult<Json<UserDto>> {
    Ok(Json(UserService::create_user(state.repos(), req).await?))
}

/// PUT /api/users/:id
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<UserDto>> {
    Ok(Json(UserService::update_user(state.repos(), id, req).await?))
}

/// DELETE /api/users/:id
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    UserService::delete_user(state.repos(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
