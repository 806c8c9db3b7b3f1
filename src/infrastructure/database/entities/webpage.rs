// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "webpage")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub inserted_time: ChronoDateTimeUtc,
    #[sea_orm(column_type = "Text")]
    pub page_blob: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub parliamentary_period: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
