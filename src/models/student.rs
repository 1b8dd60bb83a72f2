use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Originating registration, when the student came in through the portal
    #[sea_orm(unique)]
    pub registration_id: Option<i64>,
    /// Login identity provisioned at approval time
    pub auth_user_id: i64,
    #[sea_orm(unique)]
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub program_id: i64,
    pub year_level: i32,
    pub is_returning_student: bool,
    pub status: String,
    pub created_at: DateTimeUtc,
}

pub const STATUS_ACTIVE: &str = "Active";

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::program::Entity",
        from = "Column::ProgramId",
        to = "super::program::Column::Id"
    )]
    Program,
    #[sea_orm(
        belongs_to = "super::registration::Entity",
        from = "Column::RegistrationId",
        to = "super::registration::Column::Id"
    )]
    Registration,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthUserId",
        to = "super::user::Column::Id"
    )]
    AuthUser,
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
}

impl Related<super::program::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Program.def()
    }
}

impl Related<super::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registration.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthUser.def()
    }
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
