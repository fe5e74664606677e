//! Migration: Create transaction_histories table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000003_create_products_table::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TransactionHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TransactionHistories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TransactionHistories::ProductId).uuid().not_null())
                    .col(ColumnDef::new(TransactionHistories::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(TransactionHistories::Quantity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionHistories::TotalPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionHistories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionHistories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_histories_product_id")
                            .from(TransactionHistories::Table, TransactionHistories::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_histories_user_id")
                            .from(TransactionHistories::Table, TransactionHistories::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transaction_histories_user_id")
                    .table(TransactionHistories::Table)
                    .col(TransactionHistories::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TransactionHistories::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TransactionHistories {
    Table,
    Id,
    ProductId,
    UserId,
    Quantity,
    TotalPrice,
    CreatedAt,
    UpdatedAt,
}
