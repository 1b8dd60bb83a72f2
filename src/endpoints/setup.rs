//! First-run setup: create the initial administrator account.
//!
//! Self-disabling: every endpoint here rejects with 403 once an admin-role
//! user exists.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::prelude::*;
use crate::models::user;
use crate::services::security::hash_password;
use crate::state::AppState;

pub fn setup_routes(state: AppState) -> Router {
    Router::new()
        .route("/required", get(check_setup_required))
        .route("/initialize", post(initialize_setup))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct SetupRequiredResponse {
    setup_required: bool,
}

#[derive(Debug, Deserialize, Validate)]
struct SetupRequest {
    #[validate(email)]
    admin_email: String,
    #[validate(length(min = 8))]
    admin_password: String,
    #[validate(length(min = 1, max = 200))]
    display_name: String,
}

#[derive(Debug, Serialize)]
struct SetupResponse {
    id: i64,
    email: String,
    role: String,
}

/// Check if any admin-role user exists
async fn admin_user_exists(state: &AppState) -> Result<bool> {
    let admin = User::find()
        .filter(user::Column::Role.eq(user::ROLE_ADMIN))
        .one(&state.db)
        .await?;
    Ok(admin.is_some())
}

/// Check if setup is required (no admin user exists)
async fn check_setup_required(
    State(state): State<AppState>,
) -> Result<Json<SetupRequiredResponse>> {
    let admin_exists = admin_user_exists(&state).await?;

    Ok(Json(SetupRequiredResponse {
        setup_required: !admin_exists,
    }))
}

/// Create the first administrator account
async fn initialize_setup(
    State(state): State<AppState>,
    Json(data): Json<SetupRequest>,
) -> Result<(StatusCode, Json<SetupResponse>)> {
    if admin_user_exists(&state).await? {
        return Err(AppError::Forbidden("Setup already complete".to_string()));
    }
    data.validate()?;

    let now = Utc::now();
    let new_admin = user::ActiveModel {
        email: Set(data.admin_email.clone()),
        hashed_password: Set(hash_password(&data.admin_password)?),
        display_name: Set(data.display_name.clone()),
        role: Set(user::ROLE_ADMIN.to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let inserted = new_admin.insert(&state.db).await?;

    let _ = state
        .audit
        .log_success(
            AuditAction::AdminCreated,
            ResourceType::User,
            Some(inserted.id.to_string()),
            Some(&inserted),
            None,
        )
        .await;

    tracing::info!(user_id = inserted.id, "initial administrator created");

    Ok((
        StatusCode::CREATED,
        Json(SetupResponse {
            id: inserted.id,
            email: inserted.email,
            role: inserted.role,
        }),
    ))
}
