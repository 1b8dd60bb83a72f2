use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::Authenticated;
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::prelude::*;
use crate::models::{student, user};
use crate::services::security::{create_access_token, verify_password};
use crate::state::AppState;

/// Create auth routes (public)
pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/login", post(login))
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    pub role: String,
    /// Student record linked to this login, when one exists
    pub student_id: Option<i64>,
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// Authenticate with email and password, returning a Bearer token
async fn login(
    State(state): State<AppState>,
    Json(data): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let found = User::find()
        .filter(user::Column::Email.eq(data.email.clone()))
        .filter(user::Column::IsActive.eq(true))
        .one(&state.db)
        .await?;

    let found = match found {
        Some(u) if verify_password(&data.password, &u.hashed_password) => u,
        _ => {
            let _ = state
                .audit
                .log_failure(
                    AuditAction::LoginFailed,
                    ResourceType::User,
                    Some(data.email.clone()),
                    None,
                    None,
                    "invalid credentials",
                )
                .await;
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }
    };

    let token = create_access_token(found.id, &found.email, &found.role)?;

    let student_id = linked_student_id(&state, &found).await?;

    let _ = state
        .audit
        .log_success(
            AuditAction::Login,
            ResourceType::User,
            Some(found.id.to_string()),
            Some(&found),
            None,
        )
        .await;

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        user: UserInfo {
            id: found.id,
            email: found.email,
            display_name: found.display_name,
            role: found.role,
            student_id,
        },
    }))
}

/// Current user info (protected, wired at /api/me)
pub async fn me(
    Authenticated(user): Authenticated,
    State(state): State<AppState>,
) -> Result<Json<UserInfo>> {
    let student_id = linked_student_id(&state, &user).await?;

    Ok(Json(UserInfo {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
        role: user.role,
        student_id,
    }))
}

async fn linked_student_id(state: &AppState, user: &user::Model) -> Result<Option<i64>> {
    let student = Student::find()
        .filter(student::Column::AuthUserId.eq(user.id))
        .one(&state.db)
        .await?;
    Ok(student.map(|s| s.id))
}
