// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::page_record::{NewPageRecord, PageRecord};
use crate::domain::models::period::PeriodIdentifier;
use crate::domain::repositories::page_store::PageStore;
use crate::infrastructure::database::entities::webpage;
use crate::utils::errors::StorageError;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use sea_orm::*;
use std::sync::Arc;

/// 页面存储实现
///
/// 基于sea-orm，记录写入 `webpage` 表
pub struct PageStoreImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl PageStoreImpl {
    /// 创建新的页面存储实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<webpage::Model> for PageRecord {
    type Error = StorageError;

    fn try_from(m: webpage::Model) -> Result<Self, Self::Error> {
        let period = m
            .parliamentary_period
            .map(PeriodIdentifier::new)
            .transpose()
            .map_err(|e| StorageError::InvalidRecord(format!("webpage {}: {}", m.id, e)))?;

        Ok(PageRecord {
            id: m.id,
            period,
            content: m.page_blob,
            fetched_at: m.inserted_time,
        })
    }
}

#[async_trait]
impl PageStore for PageStoreImpl {
    async fn find_fresh_by_period(
        &self,
        period: &PeriodIdentifier,
        window: Duration,
    ) -> Result<Option<PageRecord>, StorageError> {
        let cutoff = Utc::now() - window;
        let model = webpage::Entity::find()
            .filter(webpage::Column::ParliamentaryPeriod.eq(period.as_str()))
            .filter(webpage::Column::InsertedTime.gt(cutoff))
            .order_by_desc(webpage::Column::InsertedTime)
            .order_by_desc(webpage::Column::Id)
            .one(self.db.as_ref())
            .await?;

        model.map(PageRecord::try_from).transpose()
    }

    async fn find_fresh_unscoped(
        &self,
        window: Duration,
    ) -> Result<Option<PageRecord>, StorageError> {
        let cutoff = Utc::now() - window;
        let model = webpage::Entity::find()
            .filter(webpage::Column::ParliamentaryPeriod.is_null())
            .filter(webpage::Column::InsertedTime.gt(cutoff))
            .order_by_desc(webpage::Column::InsertedTime)
            .order_by_desc(webpage::Column::Id)
            .one(self.db.as_ref())
            .await?;

        model.map(PageRecord::try_from).transpose()
    }

    async fn insert(&self, record: NewPageRecord) -> Result<PageRecord, StorageError> {
        let active_model = webpage::ActiveModel {
            id: NotSet,
            inserted_time: Set(record.fetched_at),
            page_blob: Set(record.content),
            parliamentary_period: Set(record.period.map(String::from)),
        };

        let model = active_model.insert(self.db.as_ref()).await?;
        PageRecord::try_from(model)
    }

    async fn exists_for_period(&self, period: &PeriodIdentifier) -> Result<bool, StorageError> {
        let count = webpage::Entity::find()
            .filter(webpage::Column::ParliamentaryPeriod.eq(period.as_str()))
            .count(self.db.as_ref())
            .await?;

        Ok(count > 0)
    }
}
