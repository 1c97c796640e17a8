//! Create trips table migration

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trips::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Trips::Truck).string_len(20).not_null())
                    .col(ColumnDef::new(Trips::Driver).string_len(100).not_null())
                    .col(ColumnDef::new(Trips::Origin).string_len(100).not_null())
                    .col(ColumnDef::new(Trips::Destination).string_len(100).not_null())
                    .col(ColumnDef::new(Trips::Fuel).string_len(20).not_null())
                    .col(ColumnDef::new(Trips::Liters).integer().not_null())
                    .col(
                        ColumnDef::new(Trips::DepartureDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Trips::Status)
                            .string_len(20)
                            .not_null()
                            .default("Scheduled"),
                    )
                    .col(
                        ColumnDef::new(Trips::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Trips::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Status tabs and fuel filters hit these on every list call
        manager
            .create_index(
                Index::create()
                    .name("idx_trips_status")
                    .table(Trips::Table)
                    .col(Trips::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trips_fuel")
                    .table(Trips::Table)
                    .col(Trips::Fuel)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trips_created_at")
                    .table(Trips::Table)
                    .col(Trips::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Trips {
    Table,
    Id,
    Truck,
    Driver,
    Origin,
    Destination,
    Fuel,
    Liters,
    DepartureDate,
    Status,
    CreatedAt,
    UpdatedAt,
}
