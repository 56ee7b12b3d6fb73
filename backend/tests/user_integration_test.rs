//! Integration tests for the user endpoints

mod common;

use axum::http::StatusCode;
use common::{json_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_create_user_hides_password() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/users",
            &json!({"username": "alice", "email": "a@x.com", "password": "pw"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let user = json_body(&body);
    assert!(user["id"].as_i64().is_some());
    assert_eq!(user["username"], "alice");
    assert!(!body.contains("password"));
    assert!(!body.contains("\"pw\""));
}

#[tokio::test]
async fn test_lookup_by_username_and_email() {
    let app = TestApp::new();
    let user = app.create_user().await;
    let id = user["id"].as_i64().unwrap();

    let (status, body) = app
        .get(&format!("/api/users/username/{}", user["username"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["id"], id);

    let (status, body) = app
        .get(&format!("/api/users/email/{}", user["email"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["id"], id);

    let (status, _) = app.get("/api/users/username/nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_username_is_bad_request() {
    let app = TestApp::new();
    let body = json!({"username": "bob", "email": "bob@x.com", "password": "pw"});
    app.post("/api/users", &body).await;

    let again = json!({"username": "bob", "email": "bob2@x.com", "password": "pw"});
    let (status, _) = app.post("/api/users", &again).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new();

    let (status, _) = app.post_raw("/api/users", "{\"username\": ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/users", &json!({"username": "carol", "email": "c@x.com"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_onboarding_goals_in_response() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/users",
            &json!({
                "username": "dana",
                "email": "dana@x.com",
                "password": "pw",
                "fitnessLevel": "Intermediate",
                "goals": [
                    {"category": "strength", "goal": "Bench bodyweight", "metric": "kg"},
                    {"category": "cardio", "goal": "Run 10k", "metric": "km"}
                ]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let user = json_body(&body);
    assert_eq!(user["fitnessLevel"], "intermediate");
    let goals = user["goals"].as_array().unwrap();
    assert_eq!(goals.len(), 2);
    assert!(goals.iter().all(|g| g["unit"] == "%" && g["status"] == "active"));
    assert_eq!(user["workouts"], json!([]));
}

#[tokio::test]
async fn test_update_user_profile() {
    let app = TestApp::new();
    let user = app.create_user().await;
    let id = user["id"].as_i64().unwrap();

    let (status, body) = app
        .put(
            &format!("/api/users/{}", id),
            &json!({"firstName": "Erin", "height": 168.0, "weight": 61.5}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let updated = json_body(&body);
    assert_eq!(updated["firstName"], "Erin");
    assert_eq!(updated["username"], user["username"]);

    let (status, _) = app
        .put(&format!("/api/users/{}", id), &json!({"height": 10.0}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.put("/api/users/999", &json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user_cascades() {
    let app = TestApp::new();
    let user = app.create_user().await;
    let id = user["id"].as_i64().unwrap();

    let (_, workout) = app
        .post(
            "/api/workouts",
            &json!({"name": "Ride", "userId": id, "startTime": "2024-04-01T07:00:00Z"}),
        )
        .await;
    let workout_id = json_body(&workout)["id"].as_i64().unwrap();
    app.post("/api/goals", &json!({"title": "Ride 100k", "userId": id}))
        .await;

    let (status, body) = app.delete(&format!("/api/users/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _) = app.get(&format!("/api/workouts/{}", workout_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, goals) = app.get(&format!("/api/goals/user/{}", id)).await;
    assert_eq!(json_body(&goals), json!([]));

    let (status, _) = app.delete(&format!("/api/users/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
