use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only ledger entry. Rows are never updated or deleted, with one
/// exception: the `Pending`-method placeholder created on enrollment
/// approval has its amount refreshed when fees are recomputed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub enrollment_id: i64,
    pub amount: f64,
    pub payment_method: String,
    pub reference_number: Option<String>,
    pub payment_date: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

/// Placeholder method marking the amount due on an approved enrollment.
/// Excluded from paid-amount arithmetic.
pub const METHOD_PENDING: &str = "Pending";

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::enrollment::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollment::Column::Id"
    )]
    Enrollment,
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
