//! End-to-end API tests over the assembled router.
//!
//! Each test boots a fresh server state on a temporary database, so the
//! bootstrap path (default admin, default sites, module catalog) runs
//! exactly as it does in production.

use axum::Router;
use axum::body::Body;
use farm_server::auth::JwtConfig;
use farm_server::{Config, ServerState, api};
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("paddock-test.db");

    let mut config = Config::with_overrides(
        dir.path().to_string_lossy().to_string(),
        db_path.to_string_lossy().to_string(),
        0,
    );
    config.pin_pepper = "test-pepper".into();
    config.jwt = JwtConfig {
        secret: "test-secret-test-secret-test-secret!".into(),
        ..JwtConfig::default()
    };

    let state = ServerState::initialize(&config).await.expect("state");
    (api::build_app(state), dir)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

fn delete(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request")
}

/// Log in with the bootstrap admin PIN and return the token.
async fn admin_token(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(post_json("/api/auth/login", None, json!({ "pin": "0000" })))
        .await
        .expect("login");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn health_needs_no_token() {
    let (app, _dir) = test_app().await;
    let response = app.oneshot(get("/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn protected_routes_reject_missing_token() {
    let (app, _dir) = test_app().await;
    let response = app.oneshot(get("/api/modules", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bootstrap_admin_can_log_in_and_sees_the_catalog() {
    let (app, _dir) = test_app().await;
    let token = admin_token(&app).await;

    let response = app
        .clone()
        .oneshot(get("/api/modules", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let modules = body_json(response).await;
    let labels: Vec<&str> = modules
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["label"].as_str().unwrap())
        .collect();
    // Label-ordered and including the admin-only entries
    assert!(labels.contains(&"Eggs"));
    assert!(labels.contains(&"Settings"));
    let mut sorted = labels.clone();
    sorted.sort();
    assert_eq!(labels, sorted);
}

#[tokio::test]
async fn wrong_pin_gets_a_uniform_rejection() {
    let (app, _dir) = test_app().await;
    let response = app
        .oneshot(post_json("/api/auth/login", None, json!({ "pin": "9999" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid PIN");
}

#[tokio::test]
async fn non_admin_is_blocked_from_admin_routes_and_admin_only_modules() {
    let (app, _dir) = test_app().await;
    let token = admin_token(&app).await;

    // Admin creates a regular user
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/users",
            Some(&token),
            json!({ "username": "anna", "pin": "1234" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Regular user logs in
    let response = app
        .clone()
        .oneshot(post_json("/api/auth/login", None, json!({ "pin": "1234" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let anna_token = body_json(response).await["token"].as_str().unwrap().to_string();

    // Admin route is forbidden
    let response = app
        .clone()
        .oneshot(get("/api/users", Some(&anna_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // No memberships recorded: sees all non-admin modules, none admin-only
    let response = app
        .clone()
        .oneshot(get("/api/modules", Some(&anna_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let modules = body_json(response).await;
    let modules = modules.as_array().unwrap();
    assert!(!modules.is_empty());
    assert!(modules.iter().all(|m| m["admin_only"] == false));
}

#[tokio::test]
async fn deleted_user_token_is_rejected_immediately() {
    let (app, _dir) = test_app().await;
    let token = admin_token(&app).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/users",
            Some(&token),
            json!({ "username": "anna", "pin": "1234" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let anna_id = body_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json("/api/auth/login", None, json!({ "pin": "1234" })))
        .await
        .unwrap();
    let anna_token = body_json(response).await["token"].as_str().unwrap().to_string();

    // Works before deletion
    let response = app
        .clone()
        .oneshot(get("/api/modules", Some(&anna_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/users/{anna_id}"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The still-unexpired token no longer opens anything
    let response = app
        .clone()
        .oneshot(get("/api/modules", Some(&anna_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cattle_registry_tracks_intake_history_and_exit() {
    let (app, _dir) = test_app().await;
    let token = admin_token(&app).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/cattle",
            Some(&token),
            json!({ "name": "Berta", "ear_tag": "DE 12345", "birth_date": "2023-05-14", "breed": "Fleckvieh" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let id = body_json(response).await["id"].as_i64().unwrap();

    // Duplicate ear tag is a conflict
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/cattle",
            Some(&token),
            json!({ "name": "Paula", "ear_tag": "DE 12345", "birth_date": "2024-01-02" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/cattle/{id}/events"),
            Some(&token),
            json!({ "kind": "medication", "label": "Penicillin", "dose": "20 ml" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["dose"], "20 ml");

    let response = app
        .clone()
        .oneshot(get(&format!("/api/cattle/{id}"), Some(&token)))
        .await
        .unwrap();
    let detail = body_json(response).await;
    assert_eq!(detail["name"], "Berta");
    assert_eq!(detail["events"].as_array().unwrap().len(), 1);

    // Exit removes the animal
    let response = app
        .clone()
        .oneshot(delete(&format!("/api/cattle/{id}"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .clone()
        .oneshot(get(&format!("/api/cattle/{id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn riding_lessons_can_be_planned_and_removed() {
    let (app, _dir) = test_app().await;
    let token = admin_token(&app).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/horses/lessons",
            Some(&token),
            json!({ "lesson_type": "Dressage", "lesson_date": "2026-09-01", "duration_minutes": 45, "horse": "Luna" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/horses/lessons", Some(&token)))
        .await
        .unwrap();
    let lessons = body_json(response).await;
    assert_eq!(lessons.as_array().unwrap().len(), 1);
    assert_eq!(lessons[0]["horse"], "Luna");

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/horses/lessons/{id}"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/horses/lessons", Some(&token)))
        .await
        .unwrap();
    assert!(body_json(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn disposal_beyond_balance_is_a_422() {
    let (app, _dir) = test_app().await;
    let token = admin_token(&app).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/eggs/production",
            Some(&token),
            json!({ "quantity": 10 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/eggs/disposal",
            Some(&token),
            json!({ "quantity": 11, "reason": "sale" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["code"], "E0005");

    // Balance is untouched
    let response = app
        .clone()
        .oneshot(get("/api/eggs/overview", Some(&token)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["balance"], 10);
}

#[tokio::test]
async fn booking_pass_books_selected_subscriptions() {
    let (app, _dir) = test_app().await;
    let token = admin_token(&app).await;

    // Stock up
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/eggs/production",
            Some(&token),
            json!({ "quantity": 40 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A subscription due today
    let weekday = chrono::Datelike::weekday(&chrono::Local::now().date_naive())
        .num_days_from_monday() as i64;
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/subscriptions",
            Some(&token),
            json!({ "name": "Huber", "quantity": 10, "weekday": weekday }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let sub_id = body_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/subscriptions/due-today", Some(&token)))
        .await
        .unwrap();
    let due = body_json(response).await;
    assert_eq!(due.as_array().unwrap().len(), 1);

    let mut selections = serde_json::Map::new();
    selections.insert(sub_id.to_string(), Value::Null);
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/subscriptions/book-today",
            Some(&token),
            json!({ "selections": selections }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await;
    assert_eq!(summary["count"], 1);
    assert_eq!(summary["total"], 10);

    let response = app
        .clone()
        .oneshot(get("/api/eggs/overview", Some(&token)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["balance"], 30);
}
