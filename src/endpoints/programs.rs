use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{Authorized, ProgramsManage, ProgramsView};
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::prelude::*;
use crate::models::{course, program, registration, student, year};
use crate::schemas::program::{
    CreateCourse, CreateProgram, CreateYear, UpdateCourse, UpdateProgram,
};
use crate::state::AppState;

pub fn programs_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_programs).post(create_program))
        .route(
            "/:program_id",
            get(get_program).patch(update_program).delete(delete_program),
        )
        .route(
            "/:program_id/years",
            get(list_years).post(create_year),
        )
        .route("/years/:year_id", delete(delete_year))
        .route(
            "/years/:year_id/courses",
            get(list_courses).post(create_course),
        )
        .route(
            "/courses/:course_id",
            patch(update_course).delete(remove_course),
        )
        .with_state(state)
}

// ============================================================================
// Program Handlers
// ============================================================================

/// List programs (any authenticated role)
async fn list_programs(
    Authorized(_user, _): Authorized<ProgramsView>,
    State(state): State<AppState>,
) -> Result<Json<Vec<program::Model>>> {
    let programs = Program::find()
        .order_by_asc(program::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(programs))
}

async fn get_program(
    Authorized(_user, _): Authorized<ProgramsView>,
    State(state): State<AppState>,
    Path(program_id): Path<i64>,
) -> Result<Json<program::Model>> {
    let found = Program::find_by_id(program_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Program not found".to_string()))?;
    Ok(Json(found))
}

/// Create a program (requires programs.manage)
async fn create_program(
    Authorized(admin, _): Authorized<ProgramsManage>,
    State(state): State<AppState>,
    Json(data): Json<CreateProgram>,
) -> Result<(StatusCode, Json<program::Model>)> {
    data.validate()?;

    let existing = Program::find()
        .filter(program::Column::ProgramCode.eq(data.program_code.clone()))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "Program code {} already exists",
            data.program_code
        )));
    }

    let new_program = program::ActiveModel {
        program_code: Set(data.program_code),
        program_name: Set(data.program_name),
        total_units: Set(data.total_units),
        years_to_complete: Set(data.years_to_complete),
        status: Set("Active".to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let inserted = new_program.insert(&state.db).await?;

    let _ = state
        .audit
        .log_success(
            AuditAction::ProgramCreated,
            ResourceType::Program,
            Some(inserted.id.to_string()),
            Some(&admin),
            None,
        )
        .await;

    Ok((StatusCode::CREATED, Json(inserted)))
}

async fn update_program(
    Authorized(admin, _): Authorized<ProgramsManage>,
    State(state): State<AppState>,
    Path(program_id): Path<i64>,
    Json(data): Json<UpdateProgram>,
) -> Result<Json<program::Model>> {
    let found = Program::find_by_id(program_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Program not found".to_string()))?;

    let mut active: program::ActiveModel = found.into();
    if let Some(code) = data.program_code {
        active.program_code = Set(code);
    }
    if let Some(name) = data.program_name {
        active.program_name = Set(name);
    }
    if let Some(units) = data.total_units {
        active.total_units = Set(units);
    }
    if let Some(years) = data.years_to_complete {
        active.years_to_complete = Set(years);
    }
    if let Some(status) = data.status {
        active.status = Set(status);
    }
    let updated = active.update(&state.db).await?;

    let _ = state
        .audit
        .log_success(
            AuditAction::ProgramUpdated,
            ResourceType::Program,
            Some(program_id.to_string()),
            Some(&admin),
            None,
        )
        .await;

    Ok(Json(updated))
}

/// Delete a program; rejected while students or registrations reference it
async fn delete_program(
    Authorized(admin, _): Authorized<ProgramsManage>,
    State(state): State<AppState>,
    Path(program_id): Path<i64>,
) -> Result<StatusCode> {
    let found = Program::find_by_id(program_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Program not found".to_string()))?;

    let student_refs = Student::find()
        .filter(student::Column::ProgramId.eq(program_id))
        .count(&state.db)
        .await?;
    let registration_refs = Registration::find()
        .filter(registration::Column::ProgramId.eq(program_id))
        .count(&state.db)
        .await?;

    if student_refs > 0 || registration_refs > 0 {
        return Err(AppError::Conflict(
            "Program is in use and cannot be deleted".to_string(),
        ));
    }

    found.delete(&state.db).await?;

    let _ = state
        .audit
        .log_success(
            AuditAction::ProgramDeleted,
            ResourceType::Program,
            Some(program_id.to_string()),
            Some(&admin),
            None,
        )
        .await;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Year Handlers
// ============================================================================

async fn list_years(
    Authorized(_user, _): Authorized<ProgramsView>,
    State(state): State<AppState>,
    Path(program_id): Path<i64>,
) -> Result<Json<Vec<year::Model>>> {
    let years = Year::find()
        .filter(year::Column::ProgramId.eq(program_id))
        .order_by_asc(year::Column::YearLevel)
        .all(&state.db)
        .await?;
    Ok(Json(years))
}

/// Add a curriculum year to a program; one row per (program, year level)
async fn create_year(
    Authorized(admin, _): Authorized<ProgramsManage>,
    State(state): State<AppState>,
    Path(program_id): Path<i64>,
    Json(data): Json<CreateYear>,
) -> Result<(StatusCode, Json<year::Model>)> {
    data.validate()?;

    Program::find_by_id(program_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Program not found".to_string()))?;

    let existing = Year::find()
        .filter(year::Column::ProgramId.eq(program_id))
        .filter(year::Column::YearLevel.eq(data.year_level))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "Year level {} already defined for this program",
            data.year_level
        )));
    }

    let new_year = year::ActiveModel {
        program_id: Set(program_id),
        year_level: Set(data.year_level),
        status: Set("Active".to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let inserted = new_year.insert(&state.db).await?;

    let _ = state
        .audit
        .log_success(
            AuditAction::YearCreated,
            ResourceType::Year,
            Some(inserted.id.to_string()),
            Some(&admin),
            None,
        )
        .await;

    Ok((StatusCode::CREATED, Json(inserted)))
}

async fn delete_year(
    Authorized(admin, _): Authorized<ProgramsManage>,
    State(state): State<AppState>,
    Path(year_id): Path<i64>,
) -> Result<StatusCode> {
    let found = Year::find_by_id(year_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Year not found".to_string()))?;

    let course_refs = Course::find()
        .filter(course::Column::YearId.eq(year_id))
        .count(&state.db)
        .await?;
    if course_refs > 0 {
        return Err(AppError::Conflict(
            "Year has courses and cannot be deleted".to_string(),
        ));
    }

    found.delete(&state.db).await?;

    let _ = state
        .audit
        .log_success(
            AuditAction::YearDeleted,
            ResourceType::Year,
            Some(year_id.to_string()),
            Some(&admin),
            None,
        )
        .await;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Course Handlers
// ============================================================================

async fn list_courses(
    Authorized(_user, _): Authorized<ProgramsView>,
    State(state): State<AppState>,
    Path(year_id): Path<i64>,
) -> Result<Json<Vec<course::Model>>> {
    let courses = Course::find()
        .filter(course::Column::YearId.eq(year_id))
        .order_by_asc(course::Column::Semester)
        .order_by_asc(course::Column::CourseCode)
        .all(&state.db)
        .await?;
    Ok(Json(courses))
}

async fn create_course(
    Authorized(admin, _): Authorized<ProgramsManage>,
    State(state): State<AppState>,
    Path(year_id): Path<i64>,
    Json(data): Json<CreateCourse>,
) -> Result<(StatusCode, Json<course::Model>)> {
    data.validate()?;

    Year::find_by_id(year_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Year not found".to_string()))?;

    let new_course = course::ActiveModel {
        year_id: Set(year_id),
        course_code: Set(data.course_code),
        course_name: Set(data.course_name),
        units: Set(data.units),
        semester: Set(data.semester),
        status: Set(course::STATUS_ACTIVE.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let inserted = new_course.insert(&state.db).await?;

    let _ = state
        .audit
        .log_success(
            AuditAction::CourseCreated,
            ResourceType::Course,
            Some(inserted.id.to_string()),
            Some(&admin),
            None,
        )
        .await;

    Ok((StatusCode::CREATED, Json(inserted)))
}

async fn update_course(
    Authorized(admin, _): Authorized<ProgramsManage>,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Json(data): Json<UpdateCourse>,
) -> Result<Json<course::Model>> {
    let found = Course::find_by_id(course_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    let mut active: course::ActiveModel = found.into();
    if let Some(code) = data.course_code {
        active.course_code = Set(code);
    }
    if let Some(name) = data.course_name {
        active.course_name = Set(name);
    }
    if let Some(units) = data.units {
        active.units = Set(units);
    }
    if let Some(semester) = data.semester {
        active.semester = Set(semester);
    }
    if let Some(status) = data.status {
        if ![course::STATUS_ACTIVE, course::STATUS_INACTIVE, course::STATUS_REMOVED]
            .contains(&status.as_str())
        {
            return Err(AppError::BadRequest(format!(
                "Invalid course status: {}",
                status
            )));
        }
        active.status = Set(status);
    }
    let updated = active.update(&state.db).await?;

    let _ = state
        .audit
        .log_success(
            AuditAction::CourseUpdated,
            ResourceType::Course,
            Some(course_id.to_string()),
            Some(&admin),
            None,
        )
        .await;

    Ok(Json(updated))
}

/// Remove a course from the curriculum. Enrollment history may reference
/// it, so removal is a status change rather than a row delete.
async fn remove_course(
    Authorized(admin, _): Authorized<ProgramsManage>,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<Json<course::Model>> {
    let found = Course::find_by_id(course_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    let mut active: course::ActiveModel = found.into();
    active.status = Set(course::STATUS_REMOVED.to_string());
    let updated = active.update(&state.db).await?;

    let _ = state
        .audit
        .log_success(
            AuditAction::CourseDeleted,
            ResourceType::Course,
            Some(course_id.to_string()),
            Some(&admin),
            None,
        )
        .await;

    Ok(Json(updated))
}
