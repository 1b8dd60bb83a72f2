//! Migration: Create students table

use sea_orm_migration::prelude::*;

use super::m20260115_000001_create_users::Users;
use super::m20260115_000002_create_programs::Programs;
use super::m20260115_000005_create_registrations::Registrations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Students::RegistrationId)
                            .big_integer()
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Students::AuthUserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Students::StudentNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::FirstName).string().not_null())
                    .col(ColumnDef::new(Students::LastName).string().not_null())
                    .col(ColumnDef::new(Students::MiddleName).string().null())
                    .col(
                        ColumnDef::new(Students::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::ContactNumber).string().null())
                    .col(ColumnDef::new(Students::Address).string().null())
                    .col(ColumnDef::new(Students::ProgramId).big_integer().not_null())
                    .col(ColumnDef::new(Students::YearLevel).integer().not_null())
                    .col(
                        ColumnDef::new(Students::IsReturningStudent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Students::Status)
                            .string()
                            .not_null()
                            .default("Active"),
                    )
                    .col(
                        ColumnDef::new(Students::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_students_registration")
                            .from(Students::Table, Students::RegistrationId)
                            .to(Registrations::Table, Registrations::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_students_auth_user")
                            .from(Students::Table, Students::AuthUserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_students_program")
                            .from(Students::Table, Students::ProgramId)
                            .to(Programs::Table, Programs::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_students_email")
                    .table(Students::Table)
                    .col(Students::Email)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Students::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Students {
    Table,
    Id,
    #[iden = "registration_id"]
    RegistrationId,
    #[iden = "auth_user_id"]
    AuthUserId,
    #[iden = "student_number"]
    StudentNumber,
    #[iden = "first_name"]
    FirstName,
    #[iden = "last_name"]
    LastName,
    #[iden = "middle_name"]
    MiddleName,
    Email,
    #[iden = "contact_number"]
    ContactNumber,
    Address,
    #[iden = "program_id"]
    ProgramId,
    #[iden = "year_level"]
    YearLevel,
    #[iden = "is_returning_student"]
    IsReturningStudent,
    Status,
    #[iden = "created_at"]
    CreatedAt,
}
