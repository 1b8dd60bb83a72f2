use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::error::{AppError, Result};
use crate::middleware::{Authenticated, Authorized, PaymentsRecord};
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::prelude::*;
use crate::models::{enrollment, payment, student, user};
use crate::schemas::payment::RecordPayment;
use crate::services::payments::{record_payment, PaymentReceipt};
use crate::state::AppState;

pub fn payments_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_payment))
        .route("/my", get(list_my_payments))
        .route("/enrollment/:enrollment_id", get(list_enrollment_payments))
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// Record a simulated payment against an enrollment. Students may pay only
/// their own enrollments; admins may record for anyone (cashier flow).
async fn create_payment(
    Authorized(payer, _): Authorized<PaymentsRecord>,
    State(state): State<AppState>,
    Json(data): Json<RecordPayment>,
) -> Result<(StatusCode, Json<PaymentReceipt>)> {
    if payer.role != user::ROLE_ADMIN {
        let target = Enrollment::find_by_id(data.enrollment_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Enrollment not found".to_string()))?;

        let own = Student::find()
            .filter(student::Column::AuthUserId.eq(payer.id))
            .one(&state.db)
            .await?;

        let owns = own.map(|s| s.id == target.student_id).unwrap_or(false);
        if !owns {
            return Err(AppError::Forbidden(
                "Enrollment does not belong to this account".to_string(),
            ));
        }
    }

    let receipt = record_payment(
        &state.db,
        data.enrollment_id,
        data.amount,
        &data.payment_method,
        data.reference_number,
    )
    .await?;

    let _ = state
        .audit
        .log_success(
            AuditAction::PaymentRecorded,
            ResourceType::Payment,
            Some(receipt.payment.id.to_string()),
            Some(&payer),
            Some(serde_json::json!({
                "enrollment_id": data.enrollment_id,
                "amount": receipt.payment.amount,
                "change_due": receipt.change_due,
            })),
        )
        .await;

    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Payment history across the current user's enrollments
async fn list_my_payments(
    Authenticated(user): Authenticated,
    State(state): State<AppState>,
) -> Result<Json<Vec<payment::Model>>> {
    let own = Student::find()
        .filter(student::Column::AuthUserId.eq(user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No student record for this account".to_string()))?;

    let payments = Payment::find()
        .inner_join(Enrollment)
        .filter(enrollment::Column::StudentId.eq(own.id))
        .order_by_desc(payment::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(payments))
}

/// Payment history for one enrollment (admin or the owning student)
async fn list_enrollment_payments(
    Authenticated(user): Authenticated,
    State(state): State<AppState>,
    Path(enrollment_id): Path<i64>,
) -> Result<Json<Vec<payment::Model>>> {
    let found = Enrollment::find_by_id(enrollment_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Enrollment not found".to_string()))?;

    if user.role != user::ROLE_ADMIN {
        let own = Student::find()
            .filter(student::Column::AuthUserId.eq(user.id))
            .one(&state.db)
            .await?;
        let owns = own.map(|s| s.id == found.student_id).unwrap_or(false);
        if !owns {
            return Err(AppError::Forbidden(
                "Enrollment does not belong to this account".to_string(),
            ));
        }
    }

    let payments = Payment::find()
        .filter(payment::Column::EnrollmentId.eq(enrollment_id))
        .order_by_desc(payment::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(payments))
}
