//! Migration: Create years table

use sea_orm_migration::prelude::*;

use super::m20260115_000002_create_programs::Programs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Years::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Years::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Years::ProgramId).big_integer().not_null())
                    .col(ColumnDef::new(Years::YearLevel).integer().not_null())
                    .col(
                        ColumnDef::new(Years::Status)
                            .string()
                            .not_null()
                            .default("Active"),
                    )
                    .col(
                        ColumnDef::new(Years::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_years_program")
                            .from(Years::Table, Years::ProgramId)
                            .to(Programs::Table, Programs::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one year row per (program, year level)
        manager
            .create_index(
                Index::create()
                    .name("idx_years_program_level")
                    .table(Years::Table)
                    .col(Years::ProgramId)
                    .col(Years::YearLevel)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Years::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Years {
    Table,
    Id,
    #[iden = "program_id"]
    ProgramId,
    #[iden = "year_level"]
    YearLevel,
    Status,
    #[iden = "created_at"]
    CreatedAt,
}
