//! Payment ledger tests
//!
//! Covers the ledger-sum invariant, derived payment status, and the
//! cap-at-balance / change-due policy.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

mod common;
use common::{create_test_db, insert_test_enrollment, insert_test_program, insert_test_student};

use registrar::error::AppError;
use registrar::models::prelude::*;
use registrar::models::payment;
use registrar::services::payments::record_payment;

/// amount_paid must equal the sum of recorded (non-placeholder) payments
async fn assert_ledger_invariant(db: &sea_orm::DatabaseConnection, enrollment_id: i64) {
    let found = Enrollment::find_by_id(enrollment_id)
        .one(db)
        .await
        .unwrap()
        .unwrap();
    let payments = Payment::find()
        .filter(payment::Column::EnrollmentId.eq(enrollment_id))
        .filter(payment::Column::PaymentMethod.ne(payment::METHOD_PENDING))
        .all(db)
        .await
        .unwrap();
    let ledger_sum: f64 = payments.iter().map(|p| p.amount).sum();
    assert_eq!(found.amount_paid, ledger_sum);
}

#[tokio::test]
async fn test_partial_payment_updates_status_and_total() {
    let db = create_test_db().await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let enrollee = insert_test_student(&db, "maria@school.test", program.id, 1).await;
    let target = insert_test_enrollment(&db, enrollee.id, 9500.0).await;

    let receipt = record_payment(&db, target.id, 4000.0, "Cash", None).await.unwrap();

    assert_eq!(receipt.payment.amount, 4000.0);
    assert_eq!(receipt.change_due, 0.0);

    let updated = Enrollment::find_by_id(target.id).one(&db).await.unwrap().unwrap();
    assert_eq!(updated.amount_paid, 4000.0);
    assert_eq!(updated.payment_status, "Partial");
    assert_ledger_invariant(&db, target.id).await;
}

#[tokio::test]
async fn test_full_payment_marks_paid() {
    let db = create_test_db().await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let enrollee = insert_test_student(&db, "maria@school.test", program.id, 1).await;
    let target = insert_test_enrollment(&db, enrollee.id, 9500.0).await;

    let receipt = record_payment(&db, target.id, 9500.0, "Cash", None).await.unwrap();
    assert_eq!(receipt.change_due, 0.0);

    let updated = Enrollment::find_by_id(target.id).one(&db).await.unwrap().unwrap();
    assert_eq!(updated.amount_paid, 9500.0);
    assert_eq!(updated.payment_status, "Paid");
    assert_ledger_invariant(&db, target.id).await;
}

#[tokio::test]
async fn test_successive_partials_accumulate() {
    let db = create_test_db().await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let enrollee = insert_test_student(&db, "maria@school.test", program.id, 1).await;
    let target = insert_test_enrollment(&db, enrollee.id, 9500.0).await;

    record_payment(&db, target.id, 3000.0, "Cash", None).await.unwrap();
    assert_ledger_invariant(&db, target.id).await;
    record_payment(&db, target.id, 2000.0, "GCash", Some("GC-123".to_string()))
        .await
        .unwrap();
    assert_ledger_invariant(&db, target.id).await;
    record_payment(&db, target.id, 4500.0, "Bank Transfer", None)
        .await
        .unwrap();

    let updated = Enrollment::find_by_id(target.id).one(&db).await.unwrap().unwrap();
    assert_eq!(updated.amount_paid, 9500.0);
    assert_eq!(updated.payment_status, "Paid");
    assert_ledger_invariant(&db, target.id).await;
}

#[tokio::test]
async fn test_overpayment_is_capped_and_change_reported() {
    let db = create_test_db().await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let enrollee = insert_test_student(&db, "maria@school.test", program.id, 1).await;
    let target = insert_test_enrollment(&db, enrollee.id, 9500.0).await;

    record_payment(&db, target.id, 9000.0, "Cash", None).await.unwrap();

    // 1000 tendered against a 500 balance: 500 recorded, 500 change
    let receipt = record_payment(&db, target.id, 1000.0, "Cash", None).await.unwrap();
    assert_eq!(receipt.payment.amount, 500.0);
    assert_eq!(receipt.change_due, 500.0);

    let updated = Enrollment::find_by_id(target.id).one(&db).await.unwrap().unwrap();
    assert_eq!(updated.amount_paid, 9500.0);
    assert_eq!(updated.payment_status, "Paid");
    assert!(updated.amount_paid <= updated.total_amount);
    assert_ledger_invariant(&db, target.id).await;
}

#[tokio::test]
async fn test_payment_against_settled_enrollment_is_rejected() {
    let db = create_test_db().await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let enrollee = insert_test_student(&db, "maria@school.test", program.id, 1).await;
    let target = insert_test_enrollment(&db, enrollee.id, 9500.0).await;

    record_payment(&db, target.id, 9500.0, "Cash", None).await.unwrap();

    let err = record_payment(&db, target.id, 100.0, "Cash", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidAmount(_)));

    // Nothing changed
    let updated = Enrollment::find_by_id(target.id).one(&db).await.unwrap().unwrap();
    assert_eq!(updated.amount_paid, 9500.0);
    assert_ledger_invariant(&db, target.id).await;
}

#[tokio::test]
async fn test_non_positive_amounts_are_rejected() {
    let db = create_test_db().await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let enrollee = insert_test_student(&db, "maria@school.test", program.id, 1).await;
    let target = insert_test_enrollment(&db, enrollee.id, 9500.0).await;

    let err = record_payment(&db, target.id, 0.0, "Cash", None).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidAmount(_)));

    let err = record_payment(&db, target.id, -50.0, "Cash", None).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidAmount(_)));
}

#[tokio::test]
async fn test_unknown_enrollment_is_not_found() {
    let db = create_test_db().await;

    let err = record_payment(&db, 999, 100.0, "Cash", None).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_pending_method_is_reserved() {
    let db = create_test_db().await;
    let program = insert_test_program(&db, "BSCS", "Computer Science").await;
    let enrollee = insert_test_student(&db, "maria@school.test", program.id, 1).await;
    let target = insert_test_enrollment(&db, enrollee.id, 9500.0).await;

    let err = record_payment(&db, target.id, 100.0, "Pending", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}
