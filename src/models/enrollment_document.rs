use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollment_documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub enrollment_id: i64,
    pub document_type: String,
    pub file_url: String,
    pub status: String,
    pub uploaded_at: DateTimeUtc,
    pub verified_by: Option<i64>,
    pub verified_at: Option<DateTimeUtc>,
}

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_VERIFIED: &str = "Verified";
pub const STATUS_REJECTED: &str = "Rejected";

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
