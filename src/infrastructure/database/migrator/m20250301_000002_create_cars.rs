//! Create cars table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cars::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cars::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cars::Brand).string().not_null())
                    .col(ColumnDef::new(Cars::Model).string().not_null())
                    .col(
                        ColumnDef::new(Cars::LicensePlate)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Cars::Available)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Cars::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Cars {
    Table,
    Id,
    Brand,
    Model,
    LicensePlate,
    Available,
    CreatedAt,
}
