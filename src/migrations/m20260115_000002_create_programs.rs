//! Migration: Create programs table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Programs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Programs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Programs::ProgramCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Programs::ProgramName).string().not_null())
                    .col(ColumnDef::new(Programs::TotalUnits).integer().not_null())
                    .col(
                        ColumnDef::new(Programs::YearsToComplete)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Programs::Status)
                            .string()
                            .not_null()
                            .default("Active"),
                    )
                    .col(
                        ColumnDef::new(Programs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Programs::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Programs {
    Table,
    Id,
    #[iden = "program_code"]
    ProgramCode,
    #[iden = "program_name"]
    ProgramName,
    #[iden = "total_units"]
    TotalUnits,
    #[iden = "years_to_complete"]
    YearsToComplete,
    Status,
    #[iden = "created_at"]
    CreatedAt,
}
