//! Migration: Create courses table

use sea_orm_migration::prelude::*;

use super::m20260115_000003_create_years::Years;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::YearId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::CourseCode).string().not_null())
                    .col(ColumnDef::new(Courses::CourseName).string().not_null())
                    .col(ColumnDef::new(Courses::Units).integer().not_null())
                    .col(ColumnDef::new(Courses::Semester).integer().not_null())
                    .col(
                        ColumnDef::new(Courses::Status)
                            .string()
                            .not_null()
                            .default("Active"),
                    )
                    .col(
                        ColumnDef::new(Courses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_courses_year")
                            .from(Courses::Table, Courses::YearId)
                            .to(Years::Table, Years::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Fee calculation filters on (year, semester, status)
        manager
            .create_index(
                Index::create()
                    .name("idx_courses_year_semester")
                    .table(Courses::Table)
                    .col(Courses::YearId)
                    .col(Courses::Semester)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Courses::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Courses {
    Table,
    Id,
    #[iden = "year_id"]
    YearId,
    #[iden = "course_code"]
    CourseCode,
    #[iden = "course_name"]
    CourseName,
    Units,
    Semester,
    Status,
    #[iden = "created_at"]
    CreatedAt,
}
