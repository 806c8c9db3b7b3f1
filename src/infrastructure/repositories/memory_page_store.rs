// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::page_record::{NewPageRecord, PageRecord};
use crate::domain::models::period::PeriodIdentifier;
use crate::domain::repositories::page_store::PageStore;
use crate::utils::errors::StorageError;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::RwLock;

/// 内存页面存储
///
/// 只追加的进程内存储，用于不需要持久化的运行和测试
#[derive(Default)]
pub struct MemoryPageStore {
    records: RwLock<Vec<PageRecord>>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前所有记录的快照
    pub fn records(&self) -> Vec<PageRecord> {
        self.records.read().clone()
    }

    /// 该立法期的记录数量（不论新旧）
    pub fn count_for_period(&self, period: &PeriodIdentifier) -> usize {
        self.records
            .read()
            .iter()
            .filter(|r| r.period.as_ref() == Some(period))
            .count()
    }

    fn latest_matching<F>(&self, window: Duration, predicate: F) -> Option<PageRecord>
    where
        F: Fn(&PageRecord) -> bool,
    {
        let cutoff = Utc::now() - window;
        self.records
            .read()
            .iter()
            .filter(|r| r.fetched_at > cutoff && predicate(r))
            .max_by_key(|r| (r.fetched_at, r.id))
            .cloned()
    }
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn find_fresh_by_period(
        &self,
        period: &PeriodIdentifier,
        window: Duration,
    ) -> Result<Option<PageRecord>, StorageError> {
        Ok(self.latest_matching(window, |r| r.period.as_ref() == Some(period)))
    }

    async fn find_fresh_unscoped(
        &self,
        window: Duration,
    ) -> Result<Option<PageRecord>, StorageError> {
        Ok(self.latest_matching(window, |r| r.period.is_none()))
    }

    async fn insert(&self, record: NewPageRecord) -> Result<PageRecord, StorageError> {
        let mut records = self.records.write();
        let stored = PageRecord {
            id: records.len() as i64 + 1,
            period: record.period,
            content: record.content,
            fetched_at: record.fetched_at,
        };
        records.push(stored.clone());
        Ok(stored)
    }

    async fn exists_for_period(&self, period: &PeriodIdentifier) -> Result<bool, StorageError> {
        Ok(self.count_for_period(period) > 0)
    }
}
