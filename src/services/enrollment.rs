use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::{enrollment, enrollment_course, payment, user};
use crate::services::academic::AcademicPeriod;
use crate::services::fees::FeeCalculator;

/// Create the first enrollment for a newly approved student.
///
/// Idempotent per (student, academic period): when an enrollment already
/// exists for the period this is a no-op returning `Ok(None)`. Runs on the
/// caller's connection so the approval workflow can keep it inside its
/// transaction. Course-link rows are auxiliary to billing: failures there
/// are logged and swallowed.
pub async fn create_initial_enrollment<C: ConnectionTrait>(
    conn: &C,
    fees: &FeeCalculator,
    student_id: i64,
    program_id: i64,
    year_level: i32,
    period: &AcademicPeriod,
) -> Result<Option<enrollment::Model>> {
    let existing = Enrollment::find()
        .filter(enrollment::Column::StudentId.eq(student_id))
        .filter(enrollment::Column::AcademicYear.eq(period.academic_year.clone()))
        .filter(enrollment::Column::Semester.eq(period.semester))
        .one(conn)
        .await?;

    if existing.is_some() {
        tracing::info!(student_id, academic_year = %period.academic_year, semester = period.semester,
            "enrollment already exists for period, skipping");
        return Ok(None);
    }

    let breakdown = fees
        .calculate(conn, program_id, year_level, period.semester)
        .await;

    let now = Utc::now();
    let new_enrollment = enrollment::ActiveModel {
        student_id: Set(student_id),
        academic_year: Set(period.academic_year.clone()),
        semester: Set(period.semester),
        enrollment_status: Set(enrollment::STATUS_DRAFT.to_string()),
        documents_submitted: Set(false),
        payment_status: Set(enrollment::PAYMENT_UNPAID.to_string()),
        total_amount: Set(breakdown.total_amount),
        amount_paid: Set(0.0),
        created_at: Set(now),
        ..Default::default()
    };
    let inserted = new_enrollment.insert(conn).await?;

    tracing::info!(
        enrollment_id = inserted.id,
        student_id,
        total_amount = breakdown.total_amount,
        course_count = breakdown.courses.len(),
        "created initial enrollment"
    );

    if !breakdown.courses.is_empty() {
        if let Err(e) = link_courses(conn, inserted.id, &breakdown.courses).await {
            tracing::warn!(enrollment_id = inserted.id, error = %e,
                "failed to link enrollment courses, continuing");
        }
    }

    Ok(Some(inserted))
}

/// Insert one course-link row per billed course, once per enrollment.
async fn link_courses<C: ConnectionTrait>(
    conn: &C,
    enrollment_id: i64,
    courses: &[crate::models::course::Model],
) -> Result<()> {
    let existing = EnrollmentCourse::find()
        .filter(enrollment_course::Column::EnrollmentId.eq(enrollment_id))
        .count(conn)
        .await?;

    if existing > 0 {
        return Ok(());
    }

    let now = Utc::now();
    for course in courses {
        let link = enrollment_course::ActiveModel {
            enrollment_id: Set(enrollment_id),
            course_id: Set(course.id),
            status: Set(enrollment_course::STATUS_ENROLLED.to_string()),
            created_at: Set(now),
            ..Default::default()
        };
        link.insert(conn).await?;
    }

    Ok(())
}

/// Transition an enrollment's status.
///
/// A transition to `Approved` recomputes the bill from the student's current
/// program and year: `total_amount` is overwritten, paid progress is reset
/// to Unpaid/0 (prior payment rows are kept), and exactly one
/// `Pending`-method placeholder payment carries the recomputed amount due.
/// Repeating the transition is idempotent. Any other status only updates
/// the status field.
pub async fn set_enrollment_status(
    db: &DbConn,
    fees: &FeeCalculator,
    enrollment_id: i64,
    status: &str,
    actor: &user::Model,
) -> Result<enrollment::Model> {
    if !enrollment::ALL_STATUSES.contains(&status) {
        return Err(AppError::BadRequest(format!(
            "Invalid enrollment status: {}",
            status
        )));
    }

    let txn = db.begin().await?;

    let found = Enrollment::find_by_id(enrollment_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Enrollment not found".to_string()))?;

    if status != enrollment::STATUS_APPROVED {
        let mut active: enrollment::ActiveModel = found.into();
        active.enrollment_status = Set(status.to_string());
        let updated = active.update(&txn).await?;
        txn.commit().await?;
        return Ok(updated);
    }

    let student = Student::find_by_id(found.student_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

    let breakdown = fees
        .calculate(&txn, student.program_id, student.year_level, found.semester)
        .await;

    let now = Utc::now();
    let semester = found.semester;
    let mut active: enrollment::ActiveModel = found.into();
    active.enrollment_status = Set(enrollment::STATUS_APPROVED.to_string());
    active.total_amount = Set(breakdown.total_amount);
    active.amount_paid = Set(0.0);
    active.payment_status = Set(enrollment::PAYMENT_UNPAID.to_string());
    active.approved_by = Set(Some(actor.id));
    active.approved_at = Set(Some(now));
    let updated = active.update(&txn).await?;

    ensure_placeholder_payment(&txn, enrollment_id, breakdown.total_amount).await?;

    txn.commit().await?;

    tracing::info!(
        enrollment_id,
        semester,
        total_amount = breakdown.total_amount,
        approved_by = actor.id,
        "enrollment approved, fees recomputed"
    );

    Ok(updated)
}

/// Keep exactly one `Pending`-method placeholder payment per enrollment,
/// carrying the current amount due.
async fn ensure_placeholder_payment<C: ConnectionTrait>(
    conn: &C,
    enrollment_id: i64,
    amount_due: f64,
) -> Result<()> {
    let existing = Payment::find()
        .filter(payment::Column::EnrollmentId.eq(enrollment_id))
        .filter(payment::Column::PaymentMethod.eq(payment::METHOD_PENDING))
        .one(conn)
        .await?;

    let now = Utc::now();
    match existing {
        Some(placeholder) => {
            if placeholder.amount != amount_due {
                let mut active: payment::ActiveModel = placeholder.into();
                active.amount = Set(amount_due);
                active.update(conn).await?;
            }
        }
        None => {
            let placeholder = payment::ActiveModel {
                enrollment_id: Set(enrollment_id),
                amount: Set(amount_due),
                payment_method: Set(payment::METHOD_PENDING.to_string()),
                reference_number: Set(None),
                payment_date: Set(now),
                created_at: Set(now),
                ..Default::default()
            };
            placeholder.insert(conn).await?;
        }
    }

    Ok(())
}
