//! Enrollments, documents, payments and dashboard endpoint tests

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use sea_orm::EntityTrait;
use tower::util::ServiceExt;

mod common;
use common::{
    bearer_for, build_test_state_with_db, create_test_admin, create_test_db,
    insert_test_enrollment, insert_test_program, insert_test_student,
};

use registrar::endpoints::create_router;
use registrar::models::prelude::User;

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

async fn bearer_for_student(
    db: &sea_orm::DatabaseConnection,
    enrollee: &registrar::models::student::Model,
) -> String {
    let login = User::find_by_id(enrollee.auth_user_id)
        .one(db)
        .await
        .unwrap()
        .unwrap();
    bearer_for(&login)
}

// ============================================================================
// Enrollments
// ============================================================================

#[tokio::test]
async fn test_admin_creates_enrollment_with_calculated_fees() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let admin = create_test_admin(&db).await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let enrollee = insert_test_student(&db, "maria@school.test", program.id, 1).await;
    let app = create_router(state);

    let bearer = bearer_for(&admin);
    let body = serde_json::json!({
        "student_id": enrollee.id,
        "academic_year": "2025-2026",
        "semester": 1
    })
    .to_string();

    let (status, json) = send_json(app.clone(), "POST", "/api/enrollments", Some(&bearer), Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["enrollment_status"], "Draft");
    // No curriculum defined: miscellaneous-only
    assert_eq!(json["total_amount"], 2500.0);

    // Same period again conflicts
    let (status, _) = send_json(app, "POST", "/api/enrollments", Some(&bearer), Some(&body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_student_sees_only_own_enrollments() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let mine = insert_test_student(&db, "maria@school.test", program.id, 1).await;
    let other = insert_test_student(&db, "juan@school.test", program.id, 2).await;
    insert_test_enrollment(&db, mine.id, 9500.0).await;
    let other_enrollment = insert_test_enrollment(&db, other.id, 5000.0).await;
    let app = create_router(state);

    let bearer = bearer_for_student(&db, &mine).await;

    let (status, json) = send_json(app.clone(), "GET", "/api/enrollments/my", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);

    // Admin listing is off-limits for students
    let (status, _) = send_json(app.clone(), "GET", "/api/enrollments", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Another student's enrollment cannot be fetched
    let uri = format!("/api/enrollments/{}", other_enrollment.id);
    let (status, _) = send_json(app, "GET", &uri, Some(&bearer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_status_endpoint_approves_and_recomputes() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let admin = create_test_admin(&db).await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let enrollee = insert_test_student(&db, "maria@school.test", program.id, 1).await;
    let target = insert_test_enrollment(&db, enrollee.id, 0.0).await;
    let app = create_router(state);

    let bearer = bearer_for(&admin);
    let uri = format!("/api/enrollments/{}/status", target.id);
    let body = serde_json::json!({ "status": "Approved" }).to_string();

    let (status, json) = send_json(app.clone(), "PATCH", &uri, Some(&bearer), Some(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["enrollment_status"], "Approved");
    assert_eq!(json["total_amount"], 2500.0);
    assert_eq!(json["payment_status"], "Unpaid");

    let bad = serde_json::json!({ "status": "Cancelled" }).to_string();
    let (status, _) = send_json(app, "PATCH", &uri, Some(&bearer), Some(&bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Documents
// ============================================================================

fn multipart_body(boundary: &str, document_type: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"document_type\"\r\n\r\n{dt}\r\n",
            b = boundary,
            dt = document_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            b = boundary,
            f = file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

#[tokio::test]
async fn test_document_upload_and_review_flow() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let admin = create_test_admin(&db).await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let enrollee = insert_test_student(&db, "maria@school.test", program.id, 1).await;
    let target = insert_test_enrollment(&db, enrollee.id, 9500.0).await;
    let app = create_router(state);

    let bearer = bearer_for_student(&db, &enrollee).await;

    let boundary = "registrar-test-boundary";
    let body = multipart_body(boundary, "Transcript", "transcript.pdf", b"fake pdf bytes");
    let uri = format!("/api/enrollments/{}/documents", target.id);

    let request = Request::builder()
        .uri(&uri)
        .method("POST")
        .header("Authorization", &bearer)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "Pending");
    assert_eq!(json["document_type"], "Transcript");
    let document_id = json["id"].as_i64().unwrap();
    assert!(json["file_url"]
        .as_str()
        .unwrap()
        .contains(&format!("enrollment/{}/", target.id)));

    // First upload flips the submitted flag
    let (_, json) = send_json(app.clone(), "GET", &format!("/api/enrollments/{}", target.id), Some(&bearer), None).await;
    assert_eq!(json["documents_submitted"], true);
    assert_eq!(json["documents"].as_array().unwrap().len(), 1);

    // Admin verifies the document
    let admin_bearer = bearer_for(&admin);
    let review_uri = format!("/api/enrollments/documents/{}", document_id);
    let review = serde_json::json!({ "status": "Verified" }).to_string();
    let (status, json) = send_json(app.clone(), "PATCH", &review_uri, Some(&admin_bearer), Some(&review)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "Verified");

    // Students cannot review documents
    let (status, _) = send_json(app, "PATCH", &review_uri, Some(&bearer), Some(&review)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_document_upload_rejected_for_foreign_enrollment() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let mine = insert_test_student(&db, "maria@school.test", program.id, 1).await;
    let other = insert_test_student(&db, "juan@school.test", program.id, 2).await;
    let foreign = insert_test_enrollment(&db, other.id, 9500.0).await;
    let app = create_router(state);

    let bearer = bearer_for_student(&db, &mine).await;
    let boundary = "registrar-test-boundary";
    let body = multipart_body(boundary, "Transcript", "transcript.pdf", b"data");

    let request = Request::builder()
        .uri(format!("/api/enrollments/{}/documents", foreign.id))
        .method("POST")
        .header("Authorization", &bearer)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Payments over HTTP
// ============================================================================

#[tokio::test]
async fn test_student_pays_own_enrollment_with_change_due() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let enrollee = insert_test_student(&db, "maria@school.test", program.id, 1).await;
    let target = insert_test_enrollment(&db, enrollee.id, 9500.0).await;
    let app = create_router(state);

    let bearer = bearer_for_student(&db, &enrollee).await;
    let body = serde_json::json!({
        "enrollment_id": target.id,
        "amount": 10000.0,
        "payment_method": "Cash"
    })
    .to_string();

    let (status, json) = send_json(app.clone(), "POST", "/api/payments", Some(&bearer), Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["payment"]["amount"], 9500.0);
    assert_eq!(json["change_due"], 500.0);

    // History reflects the capped amount
    let (status, json) = send_json(app, "GET", "/api/payments/my", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    let history = json.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["amount"], 9500.0);
}

#[tokio::test]
async fn test_student_cannot_pay_foreign_enrollment() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let mine = insert_test_student(&db, "maria@school.test", program.id, 1).await;
    let other = insert_test_student(&db, "juan@school.test", program.id, 2).await;
    let foreign = insert_test_enrollment(&db, other.id, 9500.0).await;
    let app = create_router(state);

    let bearer = bearer_for_student(&db, &mine).await;
    let body = serde_json::json!({
        "enrollment_id": foreign.id,
        "amount": 100.0,
        "payment_method": "Cash"
    })
    .to_string();

    let (status, _) = send_json(app, "POST", "/api/payments", Some(&bearer), Some(&body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_records_cashier_payment() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let admin = create_test_admin(&db).await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let enrollee = insert_test_student(&db, "maria@school.test", program.id, 1).await;
    let target = insert_test_enrollment(&db, enrollee.id, 9500.0).await;
    let app = create_router(state);

    let bearer = bearer_for(&admin);
    let body = serde_json::json!({
        "enrollment_id": target.id,
        "amount": 2000.0,
        "payment_method": "Cash",
        "reference_number": "OR-0001"
    })
    .to_string();

    let (status, json) = send_json(app.clone(), "POST", "/api/payments", Some(&bearer), Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["payment"]["reference_number"], "OR-0001");

    let uri = format!("/api/payments/enrollment/{}", target.id);
    let (status, json) = send_json(app, "GET", &uri, Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
}

// ============================================================================
// Dashboard
// ============================================================================

#[tokio::test]
async fn test_dashboard_analytics_aggregates() {
    let db = create_test_db().await;
    let state = build_test_state_with_db(db.clone()).await;
    let admin = create_test_admin(&db).await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let enrollee = insert_test_student(&db, "maria@school.test", program.id, 1).await;
    let target = insert_test_enrollment(&db, enrollee.id, 9500.0).await;
    registrar::services::payments::record_payment(&db, target.id, 4000.0, "Cash", None)
        .await
        .unwrap();
    let app = create_router(state);

    let bearer = bearer_for(&admin);
    let (status, json) = send_json(app, "GET", "/api/dashboard/analytics", Some(&bearer), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_students"], 1);
    assert_eq!(json["programs_count"], 1);
    assert_eq!(json["draft_enrollments"], 1);
    assert_eq!(json["partial_enrollments"], 1);
    assert_eq!(json["total_revenue"], 4000.0);
    assert_eq!(json["expected_revenue"], 9500.0);
    assert_eq!(json["pending_revenue"], 5500.0);
    assert_eq!(json["program_distribution"]["Computer Science"], 1);
    assert_eq!(json["year_level_distribution"]["Year 1"], 1);
}
