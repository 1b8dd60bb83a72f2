use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::{registration, student, user};
use crate::services::academic::current_period;
use crate::services::enrollment::create_initial_enrollment;
use crate::services::fees::FeeCalculator;
use crate::services::identity::ensure_identity;
use crate::services::notification::NotificationService;
use crate::services::security::{generate_student_number, generate_temp_password};

/// Approve a pending registration.
///
/// Provisions a login identity (create-or-rotate, outside the transaction),
/// then in a single transaction: re-checks the Pending status, creates the
/// student and their initial enrollment unless a student already exists for
/// the email, and marks the registration Approved. The credentials email is
/// sent after commit and is best-effort; a send failure never unwinds the
/// approval. Returns the student the registration resolved to.
pub async fn approve_registration(
    db: &DbConn,
    fees: &FeeCalculator,
    notification: &NotificationService,
    registration_id: i64,
    admin: &user::Model,
) -> Result<student::Model> {
    let reg = Registration::find_by_id(registration_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

    if reg.status != registration::STATUS_PENDING {
        return Err(AppError::AlreadyProcessed(format!(
            "Registration {} already processed",
            registration_id
        )));
    }

    let temp_password = generate_temp_password(12);
    let auth_user_id = ensure_identity(db, &reg.email, &reg.full_name(), &temp_password).await?;

    let txn = db.begin().await?;

    // Re-read inside the transaction: two concurrent approvals must not both
    // get past the Pending check.
    let reg = Registration::find_by_id(registration_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;
    if reg.status != registration::STATUS_PENDING {
        return Err(AppError::AlreadyProcessed(format!(
            "Registration {} already processed",
            registration_id
        )));
    }

    let existing = Student::find()
        .filter(student::Column::Email.eq(reg.email.clone()))
        .one(&txn)
        .await?;

    let resolved_student = match existing {
        Some(found) => {
            // Existing students are assumed already enrolled; skip both the
            // student insert and the initial enrollment.
            tracing::info!(student_id = found.id, email = %reg.email,
                "student already exists, skipping creation and initial enrollment");
            found
        }
        None => {
            let now = Utc::now();
            let new_student = student::ActiveModel {
                registration_id: Set(Some(reg.id)),
                auth_user_id: Set(auth_user_id),
                student_number: Set(generate_student_number()),
                first_name: Set(reg.first_name.clone()),
                last_name: Set(reg.last_name.clone()),
                middle_name: Set(reg.middle_name.clone()),
                email: Set(reg.email.clone()),
                contact_number: Set(reg.contact_number.clone()),
                address: Set(reg.address.clone()),
                program_id: Set(reg.program_id),
                year_level: Set(reg.year_level),
                is_returning_student: Set(reg.is_returning_student),
                status: Set(student::STATUS_ACTIVE.to_string()),
                created_at: Set(now),
                ..Default::default()
            };
            let inserted = new_student.insert(&txn).await?;
            tracing::info!(student_id = inserted.id, student_number = %inserted.student_number,
                "created student record");

            create_initial_enrollment(
                &txn,
                fees,
                inserted.id,
                reg.program_id,
                reg.year_level,
                &current_period(),
            )
            .await?;

            inserted
        }
    };

    let email = reg.email.clone();
    let display_name = reg.full_name();
    let mut active: registration::ActiveModel = reg.into();
    active.status = Set(registration::STATUS_APPROVED.to_string());
    active.reviewed_by = Set(Some(admin.id));
    active.reviewed_at = Set(Some(Utc::now()));
    active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(registration_id, admin_id = admin.id, "registration approved");

    // Best-effort: the data writes define success, notification does not.
    let result = notification
        .send_credentials(&email, &temp_password, &display_name)
        .await;
    if !result.success {
        tracing::warn!(registration_id, email = %email, error = ?result.error,
            "credentials email failed to send");
    }

    Ok(resolved_student)
}

/// Reject a pending registration. No side effects on students or
/// enrollments.
pub async fn reject_registration(
    db: &DbConn,
    registration_id: i64,
    admin: &user::Model,
    remarks: Option<String>,
) -> Result<registration::Model> {
    let txn = db.begin().await?;

    let reg = Registration::find_by_id(registration_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

    if reg.status != registration::STATUS_PENDING {
        return Err(AppError::AlreadyProcessed(format!(
            "Registration {} already processed",
            registration_id
        )));
    }

    let mut active: registration::ActiveModel = reg.into();
    active.status = Set(registration::STATUS_REJECTED.to_string());
    active.reviewed_by = Set(Some(admin.id));
    active.reviewed_at = Set(Some(Utc::now()));
    if remarks.is_some() {
        active.remarks = Set(remarks);
    }
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(registration_id, admin_id = admin.id, "registration rejected");

    Ok(updated)
}
