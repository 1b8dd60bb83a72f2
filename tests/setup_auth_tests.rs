//! Setup and authentication endpoint tests
//!
//! Covers first-run admin creation (self-disabling), login, and /api/me.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use sea_orm::EntityTrait;
use tower::util::ServiceExt;

mod common;
use common::{bearer_for, build_test_state_with_db, create_test_db, create_test_user};

use registrar::endpoints::create_router;

async fn send_json(
    app: axum::Router,
    method: &str,
    uri: &str,
    bearer: Option<&str>,
    json_body: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(bearer) = bearer {
        builder = builder.header("Authorization", bearer);
    }
    let request = match json_body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_setup_flow_is_self_disabling() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let app = create_router(state);

    let (status, json) = send_json(app.clone(), "GET", "/api/setup/required", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["setup_required"], true);

    let body = serde_json::json!({
        "admin_email": "admin@school.test",
        "admin_password": "a-strong-password",
        "display_name": "Registrar Admin"
    })
    .to_string();
    let (status, json) = send_json(
        app.clone(),
        "POST",
        "/api/setup/initialize",
        None,
        Some(&body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["role"], "admin");

    let (status, json) = send_json(app.clone(), "GET", "/api/setup/required", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["setup_required"], false);

    // Second initialization is forbidden
    let body = serde_json::json!({
        "admin_email": "second@school.test",
        "admin_password": "another-password",
        "display_name": "Imposter"
    })
    .to_string();
    let (status, _) = send_json(app, "POST", "/api/setup/initialize", None, Some(&body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_setup_validates_input() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let app = create_router(state);

    let body = serde_json::json!({
        "admin_email": "not-an-email",
        "admin_password": "short",
        "display_name": "X"
    })
    .to_string();
    let (status, _) = send_json(app, "POST", "/api/setup/initialize", None, Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_returns_token_and_user_info() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    create_test_user(&db, "admin@school.test", "admin-password", "admin").await;
    let app = create_router(state);

    let body = serde_json::json!({
        "email": "admin@school.test",
        "password": "admin-password"
    })
    .to_string();
    let (status, json) = send_json(app.clone(), "POST", "/auth/login", None, Some(&body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["token_type"], "bearer");
    assert_eq!(json["user"]["role"], "admin");
    let token = json["access_token"].as_str().unwrap().to_string();

    // Token works against a protected route
    let bearer = format!("Bearer {}", token);
    let (status, json) = send_json(app, "GET", "/api/me", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["email"], "admin@school.test");
}

#[tokio::test]
async fn test_login_rejects_wrong_password_and_unknown_email() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    create_test_user(&db, "admin@school.test", "admin-password", "admin").await;
    let app = create_router(state);

    let body = serde_json::json!({
        "email": "admin@school.test",
        "password": "wrong"
    })
    .to_string();
    let (status, _) = send_json(app.clone(), "POST", "/auth/login", None, Some(&body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let body = serde_json::json!({
        "email": "ghost@school.test",
        "password": "whatever"
    })
    .to_string();
    let (status, _) = send_json(app, "POST", "/auth/login", None, Some(&body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_reject_garbage_tokens() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let app = create_router(state);

    let (status, _) = send_json(
        app,
        "GET",
        "/api/me",
        Some("Bearer not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_reports_linked_student() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let program = common::insert_test_program(&db, "BSCS", "Computer Science").await;
    let enrollee = common::insert_test_student(&db, "maria@school.test", program.id, 1).await;
    let app = create_router(state);

    let login = registrar::models::prelude::User::find_by_id(enrollee.auth_user_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();

    let bearer = bearer_for(&login);
    let (status, json) = send_json(app, "GET", "/api/me", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["student_id"], enrollee.id);
}
