//! Migration: Create enrollment_documents table

use sea_orm_migration::prelude::*;

use super::m20260115_000001_create_users::Users;
use super::m20260115_000007_create_enrollments::Enrollments;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EnrollmentDocuments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnrollmentDocuments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentDocuments::EnrollmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentDocuments::DocumentType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentDocuments::FileUrl)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentDocuments::Status)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(EnrollmentDocuments::UploadedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentDocuments::VerifiedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentDocuments::VerifiedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_documents_enrollment")
                            .from(
                                EnrollmentDocuments::Table,
                                EnrollmentDocuments::EnrollmentId,
                            )
                            .to(Enrollments::Table, Enrollments::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_documents_verifier")
                            .from(EnrollmentDocuments::Table, EnrollmentDocuments::VerifiedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_documents_enrollment")
                    .table(EnrollmentDocuments::Table)
                    .col(EnrollmentDocuments::EnrollmentId)
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
                    .table(EnrollmentDocuments::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum EnrollmentDocuments {
    Table,
    Id,
    #[iden = "enrollment_id"]
    EnrollmentId,
    #[iden = "document_type"]
    DocumentType,
    #[iden = "file_url"]
    FileUrl,
    Status,
    #[iden = "uploaded_at"]
    UploadedAt,
    #[iden = "verified_by"]
    VerifiedBy,
    #[iden = "verified_at"]
    VerifiedAt,
}
