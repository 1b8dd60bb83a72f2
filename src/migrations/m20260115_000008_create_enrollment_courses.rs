//! Migration: Create enrollment_courses table

use sea_orm_migration::prelude::*;

use super::m20260115_000004_create_courses::Courses;
use super::m20260115_000007_create_enrollments::Enrollments;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EnrollmentCourses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnrollmentCourses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentCourses::EnrollmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentCourses::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentCourses::Status)
                            .string()
                            .not_null()
                            .default("Enrolled"),
                    )
                    .col(
                        ColumnDef::new(EnrollmentCourses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_courses_enrollment")
                            .from(EnrollmentCourses::Table, EnrollmentCourses::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_courses_course")
                            .from(EnrollmentCourses::Table, EnrollmentCourses::CourseId)
                            .to(Courses::Table, Courses::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_courses_natural")
                    .table(EnrollmentCourses::Table)
                    .col(EnrollmentCourses::EnrollmentId)
                    .col(EnrollmentCourses::CourseId)
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
                    .table(EnrollmentCourses::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum EnrollmentCourses {
    Table,
    Id,
    #[iden = "enrollment_id"]
    EnrollmentId,
    #[iden = "course_id"]
    CourseId,
    Status,
    #[iden = "created_at"]
    CreatedAt,
}
