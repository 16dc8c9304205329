//! Migration to create the `shipments` table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shipments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shipments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Shipments::OwnerId).uuid().not_null())
                    .col(
                        ColumnDef::new(Shipments::ShipmentTitle)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Shipments::ShipmentDescription).text().null())
                    .col(
                        ColumnDef::new(Shipments::ShipmentType)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Shipments::IsDelivered)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Shipments::Cost)
                            .decimal_len(19, 4)
                            .not_null()
                            .check(Expr::col(Shipments::Cost).gt(0)),
                    )
                    .col(ColumnDef::new(Shipments::ShipmentDate).date().not_null())
                    .col(
                        ColumnDef::new(Shipments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Shipments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shipments_owner")
                            .from(Shipments::Table, Shipments::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Default listing: one owner, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_shipments_owner_date")
                    .table(Shipments::Table)
                    .col(Shipments::OwnerId)
                    .col(Shipments::ShipmentDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shipments_owner_type")
                    .table(Shipments::Table)
                    .col(Shipments::OwnerId)
                    .col(Shipments::ShipmentType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Shipments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Shipments {
    Table,
    Id,
    OwnerId,
    ShipmentTitle,
    ShipmentDescription,
    ShipmentType,
    IsDelivered,
    Cost,
    ShipmentDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
