//! Migration: Create registrations table

use sea_orm_migration::prelude::*;

use super::m20260115_000001_create_users::Users;
use super::m20260115_000002_create_programs::Programs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Registrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Registrations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Registrations::FirstName).string().not_null())
                    .col(ColumnDef::new(Registrations::LastName).string().not_null())
                    .col(ColumnDef::new(Registrations::MiddleName).string().null())
                    .col(ColumnDef::new(Registrations::Email).string().not_null())
                    .col(ColumnDef::new(Registrations::ContactNumber).string().null())
                    .col(ColumnDef::new(Registrations::Address).string().null())
                    .col(
                        ColumnDef::new(Registrations::ProgramId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Registrations::YearLevel).integer().not_null())
                    .col(
                        ColumnDef::new(Registrations::IsReturningStudent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Registrations::Status)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Registrations::Remarks).string().null())
                    .col(
                        ColumnDef::new(Registrations::ReviewedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Registrations::ReviewedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Registrations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_registrations_program")
                            .from(Registrations::Table, Registrations::ProgramId)
                            .to(Programs::Table, Programs::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_registrations_reviewer")
                            .from(Registrations::Table, Registrations::ReviewedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_registrations_email")
                    .table(Registrations::Table)
                    .col(Registrations::Email)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_registrations_status")
                    .table(Registrations::Table)
                    .col(Registrations::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Registrations::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum Registrations {
    Table,
    Id,
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
    Remarks,
    #[iden = "reviewed_by"]
    ReviewedBy,
    #[iden = "reviewed_at"]
    ReviewedAt,
    #[iden = "created_at"]
    CreatedAt,
}
