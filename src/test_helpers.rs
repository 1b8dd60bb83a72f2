//! Test helpers and utilities for unit testing.
//!
//! Integration tests under `tests/` carry their own copy of these fixtures
//! in `tests/common/mod.rs`.

#![allow(dead_code)]

use chrono::Utc;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;

use crate::migrations::Migrator;
use crate::models::{course, program, year};

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> DatabaseConnection {
    // Use simple in-memory SQLite - each connection gets its own database
    let db_url = "sqlite::memory:";

    let db = Database::connect(db_url)
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
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
