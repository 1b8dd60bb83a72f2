use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use serde::Serialize;

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::{enrollment, payment};

/// A recorded payment plus any change owed back to the payer.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub payment: payment::Model,
    /// Portion of the tendered amount above the outstanding balance,
    /// returned out-of-band (cash handling). Zero in the common case.
    pub change_due: f64,
}

/// Append a payment to an enrollment's ledger and update the cached paid
/// total and derived payment status in the same transaction.
///
/// Payments are capped at the outstanding balance: the ledger never records
/// more than what is owed, and the excess is reported as `change_due`.
/// A payment against a settled enrollment is rejected.
pub async fn record_payment(
    db: &DbConn,
    enrollment_id: i64,
    amount: f64,
    method: &str,
    reference: Option<String>,
) -> Result<PaymentReceipt> {
    if !(amount > 0.0) {
        return Err(AppError::InvalidAmount(
            "Amount must be greater than 0".to_string(),
        ));
    }
    if method == payment::METHOD_PENDING {
        return Err(AppError::BadRequest(
            "Payment method 'Pending' is reserved for billing placeholders".to_string(),
        ));
    }

    let txn = db.begin().await?;

    let found = Enrollment::find_by_id(enrollment_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Enrollment not found".to_string()))?;

    let outstanding = found.outstanding_balance();
    if outstanding <= 0.0 {
        return Err(AppError::InvalidAmount(
            "Enrollment is already fully paid".to_string(),
        ));
    }

    let recorded_amount = amount.min(outstanding);
    let change_due = amount - recorded_amount;

    let now = Utc::now();
    let new_payment = payment::ActiveModel {
        enrollment_id: Set(enrollment_id),
        amount: Set(recorded_amount),
        payment_method: Set(method.to_string()),
        reference_number: Set(reference),
        payment_date: Set(now),
        created_at: Set(now),
        ..Default::default()
    };
    let inserted = new_payment.insert(&txn).await?;

    let new_paid = found.amount_paid + recorded_amount;
    let new_status = derive_payment_status(new_paid, found.total_amount);

    let mut active: enrollment::ActiveModel = found.into();
    active.amount_paid = Set(new_paid);
    active.payment_status = Set(new_status.to_string());
    active.update(&txn).await?;

    txn.commit().await?;

    if change_due > 0.0 {
        tracing::info!(
            enrollment_id,
            tendered = amount,
            recorded = recorded_amount,
            change_due,
            "payment capped at outstanding balance"
        );
    }
    tracing::info!(
        payment_id = inserted.id,
        enrollment_id,
        amount = recorded_amount,
        method,
        payment_status = new_status,
        "payment recorded"
    );

    Ok(PaymentReceipt {
        payment: inserted,
        change_due,
    })
}

/// Paid when the total is covered, Partial when anything has been paid,
/// Unpaid otherwise. A zero-total enrollment can never become Paid.
pub fn derive_payment_status(amount_paid: f64, total_amount: f64) -> &'static str {
    if amount_paid >= total_amount && total_amount > 0.0 {
        enrollment::PAYMENT_PAID
    } else if amount_paid > 0.0 {
        enrollment::PAYMENT_PARTIAL
    } else {
        enrollment::PAYMENT_UNPAID
    }
}
