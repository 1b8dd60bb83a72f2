use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::error::{AppError, Result};
use crate::middleware::{
    Authenticated, Authorized, DocumentsReview, EnrollmentsManage, EnrollmentsView,
};
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::prelude::*;
use crate::models::{enrollment, enrollment_document, student, user};
use crate::schemas::enrollment::{
    CreateEnrollment, EnrollmentWithDocuments, ReviewDocument, UpdateEnrollmentStatus,
};
use crate::services::academic::{current_period, AcademicPeriod};
use crate::services::enrollment::{create_initial_enrollment, set_enrollment_status};
use crate::state::AppState;

pub fn enrollments_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_enrollments).post(create_enrollment))
        .route("/my", get(list_my_enrollments))
        .route("/:enrollment_id", get(get_enrollment))
        .route("/:enrollment_id/status", patch(update_status))
        .route(
            "/:enrollment_id/documents",
            get(list_documents).post(upload_document),
        )
        .route("/documents/:document_id", patch(review_document))
        .with_state(state)
}

// ============================================================================
// Helpers
// ============================================================================

async fn with_documents(
    state: &AppState,
    enrollments: Vec<enrollment::Model>,
) -> Result<Vec<EnrollmentWithDocuments>> {
    let mut result = Vec::with_capacity(enrollments.len());
    for item in enrollments {
        let documents = EnrollmentDocument::find()
            .filter(enrollment_document::Column::EnrollmentId.eq(item.id))
            .all(&state.db)
            .await?;
        result.push(EnrollmentWithDocuments {
            enrollment: item,
            documents,
        });
    }
    Ok(result)
}

/// A student may touch an enrollment only through their own student record;
/// admins may touch any.
async fn authorize_enrollment_access(
    state: &AppState,
    user: &user::Model,
    found: &enrollment::Model,
) -> Result<()> {
    if user.role == user::ROLE_ADMIN {
        return Ok(());
    }

    let own = Student::find()
        .filter(student::Column::AuthUserId.eq(user.id))
        .one(&state.db)
        .await?;

    match own {
        Some(own) if own.id == found.student_id => Ok(()),
        _ => Err(AppError::Forbidden(
            "Enrollment does not belong to this account".to_string(),
        )),
    }
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// List every enrollment with documents (requires enrollments.view)
async fn list_enrollments(
    Authorized(_admin, _): Authorized<EnrollmentsView>,
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrollmentWithDocuments>>> {
    let enrollments = Enrollment::find()
        .order_by_desc(enrollment::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(with_documents(&state, enrollments).await?))
}

/// The current user's own enrollments with documents
async fn list_my_enrollments(
    Authenticated(user): Authenticated,
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrollmentWithDocuments>>> {
    let own = Student::find()
        .filter(student::Column::AuthUserId.eq(user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No student record for this account".to_string()))?;

    let enrollments = Enrollment::find()
        .filter(enrollment::Column::StudentId.eq(own.id))
        .order_by_desc(enrollment::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(with_documents(&state, enrollments).await?))
}

async fn get_enrollment(
    Authenticated(user): Authenticated,
    State(state): State<AppState>,
    Path(enrollment_id): Path<i64>,
) -> Result<Json<EnrollmentWithDocuments>> {
    let found = Enrollment::find_by_id(enrollment_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Enrollment not found".to_string()))?;

    authorize_enrollment_access(&state, &user, &found).await?;

    let documents = EnrollmentDocument::find()
        .filter(enrollment_document::Column::EnrollmentId.eq(found.id))
        .all(&state.db)
        .await?;

    Ok(Json(EnrollmentWithDocuments {
        enrollment: found,
        documents,
    }))
}

/// Manually create an enrollment for a student (requires enrollments.manage).
/// Fees are calculated the same way as at approval time.
async fn create_enrollment(
    Authorized(admin, _): Authorized<EnrollmentsManage>,
    State(state): State<AppState>,
    Json(data): Json<CreateEnrollment>,
) -> Result<(StatusCode, Json<enrollment::Model>)> {
    let target = Student::find_by_id(data.student_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

    let period = match (data.academic_year, data.semester) {
        (Some(academic_year), Some(semester)) => AcademicPeriod {
            academic_year,
            semester,
        },
        _ => current_period(),
    };

    let created = create_initial_enrollment(
        &state.db,
        &state.fees,
        target.id,
        target.program_id,
        target.year_level,
        &period,
    )
    .await?
    .ok_or_else(|| {
        AppError::Conflict("Enrollment already exists for this academic period".to_string())
    })?;

    let _ = state
        .audit
        .log_success(
            AuditAction::EnrollmentCreated,
            ResourceType::Enrollment,
            Some(created.id.to_string()),
            Some(&admin),
            Some(serde_json::json!({
                "student_id": target.id,
                "academic_year": created.academic_year,
                "semester": created.semester,
            })),
        )
        .await;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Transition enrollment status (requires enrollments.manage).
/// Approval recomputes fees and resets payment progress.
async fn update_status(
    Authorized(admin, _): Authorized<EnrollmentsManage>,
    State(state): State<AppState>,
    Path(enrollment_id): Path<i64>,
    Json(data): Json<UpdateEnrollmentStatus>,
) -> Result<Json<enrollment::Model>> {
    let updated =
        set_enrollment_status(&state.db, &state.fees, enrollment_id, &data.status, &admin).await?;

    let _ = state
        .audit
        .log_success(
            AuditAction::EnrollmentStatusChanged,
            ResourceType::Enrollment,
            Some(enrollment_id.to_string()),
            Some(&admin),
            Some(serde_json::json!({ "status": data.status })),
        )
        .await;

    Ok(Json(updated))
}

// ============================================================================
// Document Handlers
// ============================================================================

async fn list_documents(
    Authenticated(user): Authenticated,
    State(state): State<AppState>,
    Path(enrollment_id): Path<i64>,
) -> Result<Json<Vec<enrollment_document::Model>>> {
    let found = Enrollment::find_by_id(enrollment_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Enrollment not found".to_string()))?;

    authorize_enrollment_access(&state, &user, &found).await?;

    let documents = EnrollmentDocument::find()
        .filter(enrollment_document::Column::EnrollmentId.eq(enrollment_id))
        .order_by_desc(enrollment_document::Column::UploadedAt)
        .all(&state.db)
        .await?;

    Ok(Json(documents))
}

/// Upload a supporting document (multipart: `document_type` + `file`).
/// Students may only upload to their own enrollments.
async fn upload_document(
    Authenticated(user): Authenticated,
    State(state): State<AppState>,
    Path(enrollment_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<enrollment_document::Model>)> {
    let found = Enrollment::find_by_id(enrollment_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Enrollment not found".to_string()))?;

    authorize_enrollment_access(&state, &user, &found).await?;

    let mut document_type: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string());
        match field_name.as_deref() {
            Some("document_type") => {
                document_type = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("Invalid field: {}", e)))?,
                );
            }
            Some("file") => {
                file_name = field.file_name().map(|s| s.to_string());
                file_bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("Invalid file: {}", e)))?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    let document_type =
        document_type.ok_or_else(|| AppError::BadRequest("Missing document type".to_string()))?;
    let file_bytes =
        file_bytes.ok_or_else(|| AppError::BadRequest("Missing file".to_string()))?;
    let file_name = file_name.unwrap_or_else(|| "upload.bin".to_string());

    let rel_path = state.storage.document_path(enrollment_id, &file_name);
    state.storage.upload(&rel_path, &file_bytes).await?;
    let file_url = state.storage.public_url(&rel_path);

    let now = Utc::now();
    let new_document = enrollment_document::ActiveModel {
        enrollment_id: Set(enrollment_id),
        document_type: Set(document_type),
        file_url: Set(file_url),
        status: Set(enrollment_document::STATUS_PENDING.to_string()),
        uploaded_at: Set(now),
        ..Default::default()
    };
    let inserted = new_document.insert(&state.db).await?;

    // First upload flips the submitted flag
    if !found.documents_submitted {
        let mut active: enrollment::ActiveModel = found.into();
        active.documents_submitted = Set(true);
        active.update(&state.db).await?;
    }

    let _ = state
        .audit
        .log_success(
            AuditAction::DocumentUploaded,
            ResourceType::Document,
            Some(inserted.id.to_string()),
            Some(&user),
            Some(serde_json::json!({ "enrollment_id": enrollment_id })),
        )
        .await;

    Ok((StatusCode::CREATED, Json(inserted)))
}

/// Verify or reject an uploaded document (requires documents.review)
async fn review_document(
    Authorized(admin, _): Authorized<DocumentsReview>,
    State(state): State<AppState>,
    Path(document_id): Path<i64>,
    Json(data): Json<ReviewDocument>,
) -> Result<Json<enrollment_document::Model>> {
    if ![
        enrollment_document::STATUS_VERIFIED,
        enrollment_document::STATUS_REJECTED,
    ]
    .contains(&data.status.as_str())
    {
        return Err(AppError::BadRequest(format!(
            "Invalid document status: {}",
            data.status
        )));
    }

    let found = EnrollmentDocument::find_by_id(document_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    let mut active: enrollment_document::ActiveModel = found.into();
    active.status = Set(data.status.clone());
    active.verified_by = Set(Some(admin.id));
    active.verified_at = Set(Some(Utc::now()));
    let updated = active.update(&state.db).await?;

    let _ = state
        .audit
        .log_success(
            AuditAction::DocumentReviewed,
            ResourceType::Document,
            Some(document_id.to_string()),
            Some(&admin),
            Some(serde_json::json!({ "status": data.status })),
        )
        .await;

    Ok(Json(updated))
}
