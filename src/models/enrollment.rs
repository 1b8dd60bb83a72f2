use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One enrollment per (student, academic year, semester), enforced by a
/// unique index in addition to the pre-insert check.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    /// e.g. "2025-2026"
    pub academic_year: String,
    pub semester: i32,
    pub enrollment_status: String,
    pub documents_submitted: bool,
    pub payment_status: String,
    pub total_amount: f64,
    /// Running sum of recorded (non-placeholder) payments, maintained by the
    /// payment ledger inside the same transaction as each payment insert.
    pub amount_paid: f64,
    pub approved_by: Option<i64>,
    pub approved_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

pub const STATUS_DRAFT: &str = "Draft";
pub const STATUS_FOR_REVIEW: &str = "For Review";
pub const STATUS_APPROVED: &str = "Approved";
pub const STATUS_REJECTED: &str = "Rejected";

pub const PAYMENT_UNPAID: &str = "Unpaid";
pub const PAYMENT_PARTIAL: &str = "Partial";
pub const PAYMENT_PAID: &str = "Paid";

pub const ALL_STATUSES: [&str; 4] = [STATUS_DRAFT, STATUS_FOR_REVIEW, STATUS_APPROVED, STATUS_REJECTED];

impl Model {
    /// Balance still owed; never negative.
    pub fn outstanding_balance(&self) -> f64 {
        (self.total_amount - self.amount_paid).max(0.0)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
    #[sea_orm(has_many = "super::enrollment_document::Entity")]
    Documents,
    #[sea_orm(has_many = "super::enrollment_course::Entity")]
    Courses,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::enrollment_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl Related<super::enrollment_course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
