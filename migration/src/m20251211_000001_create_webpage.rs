// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut id = ColumnDef::new(Webpage::Id);
        // SQLite only auto-increments an INTEGER primary key
        match manager.get_database_backend() {
            DbBackend::Sqlite => id.integer(),
            _ => id.big_integer(),
        };
        id.not_null().auto_increment().primary_key();

        manager
            .create_table(
                Table::create()
                    .table(Webpage::Table)
                    .if_not_exists()
                    .col(&mut id)
                    .col(
                        ColumnDef::new(Webpage::InsertedTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Webpage::PageBlob).text().not_null())
                    .col(ColumnDef::new(Webpage::ParliamentaryPeriod).text().null())
                    .to_owned(),
            )
            .await?;

        // Lookups are always "latest record for a period"
        manager
            .create_index(
                Index::create()
                    .name("idx_webpage_period_inserted_time")
                    .table(Webpage::Table)
                    .col(Webpage::ParliamentaryPeriod)
                    .col(Webpage::InsertedTime)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Webpage::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Webpage {
    Table,
    Id,
    InsertedTime,
    PageBlob,
    ParliamentaryPeriod,
}
