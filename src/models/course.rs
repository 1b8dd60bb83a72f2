use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub year_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub units: i32,
    /// 1 or 2
    pub semester: i32,
    /// Active, Inactive or Removed; only Active courses are billable
    pub status: String,
    pub created_at: DateTimeUtc,
}

pub const STATUS_ACTIVE: &str = "Active";
pub const STATUS_INACTIVE: &str = "Inactive";
pub const STATUS_REMOVED: &str = "Removed";

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::year::Entity",
        from = "Column::YearId",
        to = "super::year::Column::Id"
    )]
    Year,
    #[sea_orm(has_many = "super::enrollment_course::Entity")]
    EnrollmentCourses,
}

impl Related<super::year::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Year.def()
    }
}

impl Related<super::enrollment_course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnrollmentCourses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
