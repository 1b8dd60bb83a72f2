use std::collections::HashMap;

use axum::{extract::State, routing::get, Json, Router};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde::Serialize;

use crate::error::Result;
use crate::middleware::{Authorized, EnrollmentsView};
use crate::models::prelude::*;
use crate::state::AppState;

pub fn dashboard_routes(state: AppState) -> Router {
    Router::new()
        .route("/analytics", get(get_analytics))
        .with_state(state)
}

/// Admin dashboard aggregates
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub total_students: u64,
    pub programs_count: u64,
    pub courses_count: u64,

    // Registrations by status
    pub pending_registrations: u64,
    pub approved_registrations: u64,
    pub rejected_registrations: u64,

    // Enrollments by status
    pub draft_enrollments: u64,
    pub for_review_enrollments: u64,
    pub approved_enrollments: u64,
    pub rejected_enrollments: u64,

    // Payment statistics
    pub paid_enrollments: u64,
    pub partial_enrollments: u64,
    pub unpaid_enrollments: u64,
    pub total_revenue: f64,
    pub expected_revenue: f64,
    pub pending_revenue: f64,

    // Distribution data
    pub program_distribution: HashMap<String, u64>,
    pub year_level_distribution: HashMap<String, u64>,
}

/// Cross-entity counts and revenue stats for the admin dashboard
async fn get_analytics(
    Authorized(_admin, _): Authorized<EnrollmentsView>,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsResponse>> {
    let total_students = Student::find().count(&state.db).await?;
    let programs_count = Program::find().count(&state.db).await?;
    let courses_count = Course::find().count(&state.db).await?;

    let registrations = Registration::find().all(&state.db).await?;
    let count_reg = |status: &str| {
        registrations
            .iter()
            .filter(|r| r.status == status)
            .count() as u64
    };

    let enrollments = Enrollment::find().all(&state.db).await?;
    let count_enroll = |status: &str| {
        enrollments
            .iter()
            .filter(|e| e.enrollment_status == status)
            .count() as u64
    };
    let count_payment = |status: &str| {
        enrollments
            .iter()
            .filter(|e| e.payment_status == status)
            .count() as u64
    };

    let total_revenue: f64 = enrollments.iter().map(|e| e.amount_paid).sum();
    let expected_revenue: f64 = enrollments.iter().map(|e| e.total_amount).sum();

    // Program and year-level distribution over students
    let students = Student::find().all(&state.db).await?;
    let program_names: HashMap<i64, String> = Program::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.program_name))
        .collect();

    let mut program_distribution: HashMap<String, u64> = HashMap::new();
    let mut year_level_distribution: HashMap<String, u64> = HashMap::new();
    for s in &students {
        let name = program_names
            .get(&s.program_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        *program_distribution.entry(name).or_insert(0) += 1;
        *year_level_distribution
            .entry(format!("Year {}", s.year_level))
            .or_insert(0) += 1;
    }

    Ok(Json(AnalyticsResponse {
        total_students,
        programs_count,
        courses_count,
        pending_registrations: count_reg("Pending"),
        approved_registrations: count_reg("Approved"),
        rejected_registrations: count_reg("Rejected"),
        draft_enrollments: count_enroll("Draft"),
        for_review_enrollments: count_enroll("For Review"),
        approved_enrollments: count_enroll("Approved"),
        rejected_enrollments: count_enroll("Rejected"),
        paid_enrollments: count_payment("Paid"),
        partial_enrollments: count_payment("Partial"),
        unpaid_enrollments: count_payment("Unpaid"),
        total_revenue,
        expected_revenue,
        pending_revenue: expected_revenue - total_revenue,
        program_distribution,
        year_level_distribution,
    }))
}
