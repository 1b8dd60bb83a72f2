//! Registrations endpoint integration tests
//!
//! Covers:
//! - `POST /api/register` (public submission with validation)
//! - `GET /api/registrations` (admin listing)
//! - `POST /api/registrations/{id}/approve` (admin only)
//! - `POST /api/registrations/{id}/reject` (admin only)

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

mod common;
use common::{
    bearer_for, build_test_state_with_db, create_test_admin, create_test_db, create_test_user,
    insert_pending_registration, insert_test_program,
};

use registrar::endpoints::create_router;

// ============================================================================
// Helpers
// ============================================================================

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

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn test_submit_registration_creates_pending_row() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let app = create_router(state);

    let body = serde_json::json!({
        "first_name": "Maria",
        "last_name": "Cruz",
        "email": "maria@school.test",
        "program_id": program.id,
        "year_level": 1
    })
    .to_string();

    let (status, json) = send_json(app, "POST", "/api/register", None, Some(&body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["status"], "Pending");
    assert_eq!(json["email"], "maria@school.test");
}

#[tokio::test]
async fn test_submit_rejects_invalid_email_and_unknown_program() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let app = create_router(state);

    let bad_email = serde_json::json!({
        "first_name": "Maria",
        "last_name": "Cruz",
        "email": "not-an-email",
        "program_id": program.id,
        "year_level": 1
    })
    .to_string();
    let (status, _) = send_json(app.clone(), "POST", "/api/register", None, Some(&bad_email)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let bad_program = serde_json::json!({
        "first_name": "Maria",
        "last_name": "Cruz",
        "email": "maria@school.test",
        "program_id": 999,
        "year_level": 1
    })
    .to_string();
    let (status, _) = send_json(app, "POST", "/api/register", None, Some(&bad_program)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_pending_registration_is_conflict() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    insert_pending_registration(&db, "maria@school.test", program.id, 1).await;
    let app = create_router(state);

    let body = serde_json::json!({
        "first_name": "Maria",
        "last_name": "Cruz",
        "email": "maria@school.test",
        "program_id": program.id,
        "year_level": 1
    })
    .to_string();

    let (status, _) = send_json(app, "POST", "/api/register", None, Some(&body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// ============================================================================
// Review
// ============================================================================

#[tokio::test]
async fn test_list_requires_auth_and_admin_role() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let student_login = create_test_user(&db, "student@school.test", "pw", "student").await;
    let app = create_router(state);

    let (status, _) = send_json(app.clone(), "GET", "/api/registrations", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let bearer = bearer_for(&student_login);
    let (status, _) = send_json(app, "GET", "/api/registrations", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_lists_and_filters_registrations() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let admin = create_test_admin(&db).await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    insert_pending_registration(&db, "a@school.test", program.id, 1).await;
    insert_pending_registration(&db, "b@school.test", program.id, 2).await;
    let app = create_router(state);

    let bearer = bearer_for(&admin);
    let (status, json) = send_json(
        app.clone(),
        "GET",
        "/api/registrations?status=Pending",
        Some(&bearer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);

    let (status, json) = send_json(
        app,
        "GET",
        "/api/registrations?status=Approved",
        Some(&bearer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_approve_endpoint_full_flow() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let admin = create_test_admin(&db).await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let reg = insert_pending_registration(&db, "maria@school.test", program.id, 1).await;
    let app = create_router(state);

    let bearer = bearer_for(&admin);
    let uri = format!("/api/registrations/{}/approve", reg.id);

    let (status, json) = send_json(app.clone(), "POST", &uri, Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["email"], "maria@school.test");
    assert!(json["student_number"].as_str().unwrap().starts_with("STU-"));

    // Second approval conflicts
    let (status, _) = send_json(app, "POST", &uri, Some(&bearer), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_approve_requires_admin_role() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let student_login = create_test_user(&db, "student@school.test", "pw", "student").await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let reg = insert_pending_registration(&db, "maria@school.test", program.id, 1).await;
    let app = create_router(state);

    let bearer = bearer_for(&student_login);
    let uri = format!("/api/registrations/{}/approve", reg.id);

    let (status, _) = send_json(app, "POST", &uri, Some(&bearer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_reject_endpoint_with_remarks() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let admin = create_test_admin(&db).await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let reg = insert_pending_registration(&db, "maria@school.test", program.id, 1).await;
    let app = create_router(state);

    let bearer = bearer_for(&admin);
    let uri = format!("/api/registrations/{}/reject", reg.id);
    let body = serde_json::json!({ "remarks": "incomplete requirements" }).to_string();

    let (status, json) = send_json(app, "POST", &uri, Some(&bearer), Some(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "Rejected");
    assert_eq!(json["remarks"], "incomplete requirements");
}

#[tokio::test]
async fn test_approve_missing_registration_is_404() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let admin = create_test_admin(&db).await;
    let app = create_router(state);

    let bearer = bearer_for(&admin);
    let (status, _) = send_json(
        app,
        "POST",
        "/api/registrations/999/approve",
        Some(&bearer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
