//! Migration: Create payments table

use sea_orm_migration::prelude::*;

use super::m20260115_000007_create_enrollments::Enrollments;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Payments::EnrollmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::Amount).double().not_null())
                    .col(ColumnDef::new(Payments::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(Payments::ReferenceNumber).string().null())
                    .col(
                        ColumnDef::new(Payments::PaymentDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_enrollment")
                            .from(Payments::Table, Payments::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_enrollment")
                    .table(Payments::Table)
                    .col(Payments::EnrollmentId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Payments {
    Table,
    Id,
    #[iden = "enrollment_id"]
    EnrollmentId,
    Amount,
    #[iden = "payment_method"]
    PaymentMethod,
    #[iden = "reference_number"]
    ReferenceNumber,
    #[iden = "payment_date"]
    PaymentDate,
    #[iden = "created_at"]
    CreatedAt,
}
