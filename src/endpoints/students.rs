use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::{Authenticated, Authorized, StudentsView};
use crate::models::prelude::*;
use crate::models::{enrollment, enrollment_document, student, user};
use crate::state::AppState;

pub fn students_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_students))
        .route("/me", get(get_my_student))
        .route("/me/dashboard", get(get_my_dashboard))
        .route("/:student_id", get(get_student))
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct StudentDashboard {
    pub current_program: String,
    pub year_level: i32,
    pub enrollment_count: u64,
    pub pending_documents: u64,
    pub outstanding_balance: f64,
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// List students (requires students.view)
async fn list_students(
    Authorized(_admin, _): Authorized<StudentsView>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<student::Model>>> {
    let skip = params.skip.unwrap_or(0);
    let limit = params.limit.unwrap_or(100);

    let students = Student::find()
        .order_by_desc(student::Column::CreatedAt)
        .offset(skip)
        .limit(limit)
        .all(&state.db)
        .await?;

    Ok(Json(students))
}

/// Get a student by id (requires students.view)
async fn get_student(
    Authorized(_admin, _): Authorized<StudentsView>,
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> Result<Json<student::Model>> {
    let found = Student::find_by_id(student_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

    Ok(Json(found))
}

/// The student record linked to the current login
async fn get_my_student(
    Authenticated(user): Authenticated,
    State(state): State<AppState>,
) -> Result<Json<student::Model>> {
    let found = find_own_student(&state, &user).await?;
    Ok(Json(found))
}

/// Student dashboard summary: program, enrollments, pending documents,
/// balance still owed across all enrollments
async fn get_my_dashboard(
    Authenticated(user): Authenticated,
    State(state): State<AppState>,
) -> Result<Json<StudentDashboard>> {
    let own = find_own_student(&state, &user).await?;

    let program = Program::find_by_id(own.program_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Program not found".to_string()))?;

    let enrollments = Enrollment::find()
        .filter(enrollment::Column::StudentId.eq(own.id))
        .all(&state.db)
        .await?;

    let enrollment_ids: Vec<i64> = enrollments.iter().map(|e| e.id).collect();
    let pending_documents = if enrollment_ids.is_empty() {
        0
    } else {
        use sea_orm::PaginatorTrait;
        EnrollmentDocument::find()
            .filter(enrollment_document::Column::EnrollmentId.is_in(enrollment_ids))
            .filter(enrollment_document::Column::Status.eq(enrollment_document::STATUS_PENDING))
            .count(&state.db)
            .await?
    };

    let outstanding_balance = enrollments.iter().map(|e| e.outstanding_balance()).sum();

    Ok(Json(StudentDashboard {
        current_program: program.program_name,
        year_level: own.year_level,
        enrollment_count: enrollments.len() as u64,
        pending_documents,
        outstanding_balance,
    }))
}

pub async fn find_own_student(state: &AppState, user: &user::Model) -> Result<student::Model> {
    Student::find()
        .filter(student::Column::AuthUserId.eq(user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No student record for this account".to_string()))
}
