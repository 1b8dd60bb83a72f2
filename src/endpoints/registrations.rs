use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{Authorized, RegistrationsManage, RegistrationsView};
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::prelude::*;
use crate::models::{registration, student};
use crate::schemas::registration::{RejectRegistration, SubmitRegistration};
use crate::services::approval::{approve_registration, reject_registration};
use crate::state::AppState;

/// Public registration submission, mounted at /api/register
pub fn public_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(submit_registration))
        .with_state(state)
}

/// Admin review routes
pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_registrations))
        .route("/:registration_id", get(get_registration))
        .route("/:registration_id/approve", post(approve))
        .route("/:registration_id/reject", post(reject))
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// Submit a registration application (public)
async fn submit_registration(
    State(state): State<AppState>,
    Json(data): Json<SubmitRegistration>,
) -> Result<(StatusCode, Json<registration::Model>)> {
    data.validate()?;

    let program = Program::find_by_id(data.program_id).one(&state.db).await?;
    if program.is_none() {
        return Err(AppError::BadRequest("Unknown program".to_string()));
    }

    // One active application per email
    let pending = Registration::find()
        .filter(registration::Column::Email.eq(data.email.clone()))
        .filter(registration::Column::Status.eq(registration::STATUS_PENDING))
        .one(&state.db)
        .await?;
    if pending.is_some() {
        return Err(AppError::Conflict(
            "A pending registration already exists for this email".to_string(),
        ));
    }

    let new_registration = registration::ActiveModel {
        first_name: Set(data.first_name),
        last_name: Set(data.last_name),
        middle_name: Set(data.middle_name),
        email: Set(data.email),
        contact_number: Set(data.contact_number),
        address: Set(data.address),
        program_id: Set(data.program_id),
        year_level: Set(data.year_level),
        is_returning_student: Set(data.is_returning_student),
        status: Set(registration::STATUS_PENDING.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let inserted = new_registration.insert(&state.db).await?;

    let _ = state
        .audit
        .log_success(
            AuditAction::RegistrationSubmitted,
            ResourceType::Registration,
            Some(inserted.id.to_string()),
            None,
            Some(serde_json::json!({ "email": inserted.email })),
        )
        .await;

    Ok((StatusCode::CREATED, Json(inserted)))
}

/// List registrations, optionally filtered by status (requires registrations.view)
async fn list_registrations(
    Authorized(_admin, _): Authorized<RegistrationsView>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<registration::Model>>> {
    let skip = params.skip.unwrap_or(0);
    let limit = params.limit.unwrap_or(100);

    let mut select = Registration::find();
    if let Some(status) = &params.status {
        select = select.filter(registration::Column::Status.eq(status.clone()));
    }

    let registrations = select
        .order_by_desc(registration::Column::CreatedAt)
        .offset(skip)
        .limit(limit)
        .all(&state.db)
        .await?;

    Ok(Json(registrations))
}

/// Get a single registration (requires registrations.view)
async fn get_registration(
    Authorized(_admin, _): Authorized<RegistrationsView>,
    State(state): State<AppState>,
    Path(registration_id): Path<i64>,
) -> Result<Json<registration::Model>> {
    let found = Registration::find_by_id(registration_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

    Ok(Json(found))
}

/// Approve a pending registration (requires registrations.manage)
async fn approve(
    Authorized(admin, _): Authorized<RegistrationsManage>,
    State(state): State<AppState>,
    Path(registration_id): Path<i64>,
) -> Result<Json<student::Model>> {
    match approve_registration(
        &state.db,
        &state.fees,
        &state.notification,
        registration_id,
        &admin,
    )
    .await
    {
        Ok(resolved) => {
            let _ = state
                .audit
                .log_success(
                    AuditAction::RegistrationApproved,
                    ResourceType::Registration,
                    Some(registration_id.to_string()),
                    Some(&admin),
                    Some(serde_json::json!({ "student_id": resolved.id })),
                )
                .await;
            Ok(Json(resolved))
        }
        Err(e) => {
            let _ = state
                .audit
                .log_failure(
                    AuditAction::RegistrationApproved,
                    ResourceType::Registration,
                    Some(registration_id.to_string()),
                    Some(&admin),
                    None,
                    &e.to_string(),
                )
                .await;
            Err(e)
        }
    }
}

/// Reject a pending registration (requires registrations.manage)
async fn reject(
    Authorized(admin, _): Authorized<RegistrationsManage>,
    State(state): State<AppState>,
    Path(registration_id): Path<i64>,
    body: Option<Json<RejectRegistration>>,
) -> Result<Json<registration::Model>> {
    let remarks = body.and_then(|Json(b)| b.remarks);

    let updated = reject_registration(&state.db, registration_id, &admin, remarks).await?;

    let _ = state
        .audit
        .log_success(
            AuditAction::RegistrationRejected,
            ResourceType::Registration,
            Some(registration_id.to_string()),
            Some(&admin),
            None,
        )
        .await;

    Ok(Json(updated))
}
