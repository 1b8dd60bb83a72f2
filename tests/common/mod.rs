//! Test helpers and utilities for integration testing.

#![allow(dead_code)]

use chrono::Utc;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;

use registrar::application::config::fees::FeeConfig;
use registrar::migrations::Migrator;
use registrar::models::{course, enrollment, program, registration, student, user, year};
use registrar::services::audit::AuditService;
use registrar::services::fees::FeeCalculator;
use registrar::services::notification::NotificationService;
use registrar::services::security::{create_access_token, hash_password};
use registrar::services::storage::StorageService;
use registrar::state::AppState;

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> DatabaseConnection {
    let db_url = "sqlite::memory:";

    let db = Database::connect(db_url)
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

/// Application state over a fresh in-memory database with default fee
/// configuration, disabled notifications, and a temp-dir storage root.
pub async fn build_test_state() -> AppState {
    let db = create_test_db().await;
    build_test_state_with_db(db).await
}

pub async fn build_test_state_with_db(db: DatabaseConnection) -> AppState {
    let upload_dir = std::env::temp_dir().join("registrar-test-uploads");
    tokio::fs::create_dir_all(&upload_dir)
        .await
        .expect("Failed to create test upload dir");

    AppState::new(
        db.clone(),
        FeeCalculator::new(FeeConfig::default()),
        AuditService::new(db),
        NotificationService::disabled(),
        StorageService::new(upload_dir, "http://localhost:8000/files"),
    )
}

/// Create a portal user and return the model
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    role: &str,
) -> user::Model {
    let now = Utc::now();
    let new_user = user::ActiveModel {
        email: Set(email.to_string()),
        hashed_password: Set(hash_password(password).unwrap()),
        display_name: Set(email.split('@').next().unwrap().to_string()),
        role: Set(role.to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    new_user.insert(db).await.unwrap()
}

pub async fn create_test_admin(db: &DatabaseConnection) -> user::Model {
    create_test_user(db, "admin@school.test", "admin-password", "admin").await
}

/// Bearer token for a user, suitable for the Authorization header
pub fn bearer_for(user: &user::Model) -> String {
    let token = create_access_token(user.id, &user.email, &user.role).unwrap();
    format!("Bearer {}", token)
}

pub async fn insert_test_program(
    db: &DatabaseConnection,
    code: &str,
    name: &str,
) -> program::Model {
    let new_program = program::ActiveModel {
        program_code: Set(code.to_string()),
        program_name: Set(name.to_string()),
        total_units: Set(120),
        years_to_complete: Set(4),
        status: Set("Active".to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    new_program.insert(db).await.unwrap()
}

pub async fn insert_test_year(
    db: &DatabaseConnection,
    program_id: i64,
    year_level: i32,
) -> year::Model {
    let new_year = year::ActiveModel {
        program_id: Set(program_id),
        year_level: Set(year_level),
        status: Set("Active".to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    new_year.insert(db).await.unwrap()
}

pub async fn insert_test_course(
    db: &DatabaseConnection,
    year_id: i64,
    code: &str,
    units: i32,
    semester: i32,
    status: &str,
) -> course::Model {
    let new_course = course::ActiveModel {
        year_id: Set(year_id),
        course_code: Set(code.to_string()),
        course_name: Set(format!("{} lecture", code)),
        units: Set(units),
        semester: Set(semester),
        status: Set(status.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    new_course.insert(db).await.unwrap()
}

/// A student with a linked login identity
pub async fn insert_test_student(
    db: &DatabaseConnection,
    email: &str,
    program_id: i64,
    year_level: i32,
) -> student::Model {
    let login = create_test_user(db, email, "student-password", "student").await;

    let new_student = student::ActiveModel {
        registration_id: Set(None),
        auth_user_id: Set(login.id),
        student_number: Set(format!("STU-TEST-{}", login.id)),
        first_name: Set("Maria".to_string()),
        last_name: Set("Cruz".to_string()),
        middle_name: Set(None),
        email: Set(email.to_string()),
        contact_number: Set(None),
        address: Set(None),
        program_id: Set(program_id),
        year_level: Set(year_level),
        is_returning_student: Set(false),
        status: Set("Active".to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    new_student.insert(db).await.unwrap()
}

pub async fn insert_test_enrollment(
    db: &DatabaseConnection,
    student_id: i64,
    total_amount: f64,
) -> enrollment::Model {
    let new_enrollment = enrollment::ActiveModel {
        student_id: Set(student_id),
        academic_year: Set("2025-2026".to_string()),
        semester: Set(1),
        enrollment_status: Set("Draft".to_string()),
        documents_submitted: Set(false),
        payment_status: Set("Unpaid".to_string()),
        total_amount: Set(total_amount),
        amount_paid: Set(0.0),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    new_enrollment.insert(db).await.unwrap()
}

pub async fn insert_pending_registration(
    db: &DatabaseConnection,
    email: &str,
    program_id: i64,
    year_level: i32,
) -> registration::Model {
    let new_registration = registration::ActiveModel {
        first_name: Set("Maria".to_string()),
        last_name: Set("Cruz".to_string()),
        middle_name: Set(None),
        email: Set(email.to_string()),
        contact_number: Set(Some("09171234567".to_string())),
        address: Set(Some("Ormoc City".to_string())),
        program_id: Set(program_id),
        year_level: Set(year_level),
        is_returning_student: Set(false),
        status: Set("Pending".to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    new_registration.insert(db).await.unwrap()
}
