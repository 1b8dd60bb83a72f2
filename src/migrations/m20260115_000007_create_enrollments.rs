//! Migration: Create enrollments table

use sea_orm_migration::prelude::*;

use super::m20260115_000001_create_users::Users;
use super::m20260115_000006_create_students::Students;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::AcademicYear)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Enrollments::Semester).integer().not_null())
                    .col(
                        ColumnDef::new(Enrollments::EnrollmentStatus)
                            .string()
                            .not_null()
                            .default("Draft"),
                    )
                    .col(
                        ColumnDef::new(Enrollments::DocumentsSubmitted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Enrollments::PaymentStatus)
                            .string()
                            .not_null()
                            .default("Unpaid"),
                    )
                    .col(
                        ColumnDef::new(Enrollments::TotalAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Enrollments::AmountPaid)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Enrollments::ApprovedBy).big_integer().null())
                    .col(
                        ColumnDef::new(Enrollments::ApprovedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_student")
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_approver")
                            .from(Enrollments::Table, Enrollments::ApprovedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One enrollment per student per academic period; the application
        // checks before inserting, this closes the race window.
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_student_period")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::AcademicYear)
                    .col(Enrollments::Semester)
                    .unique()
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
                    .table(Enrollments::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum Enrollments {
    Table,
    Id,
    #[iden = "student_id"]
    StudentId,
    #[iden = "academic_year"]
    AcademicYear,
    Semester,
    #[iden = "enrollment_status"]
    EnrollmentStatus,
    #[iden = "documents_submitted"]
    DocumentsSubmitted,
    #[iden = "payment_status"]
    PaymentStatus,
    #[iden = "total_amount"]
    TotalAmount,
    #[iden = "amount_paid"]
    AmountPaid,
    #[iden = "approved_by"]
    ApprovedBy,
    #[iden = "approved_at"]
    ApprovedAt,
    #[iden = "created_at"]
    CreatedAt,
}
