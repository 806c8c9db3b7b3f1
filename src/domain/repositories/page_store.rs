// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::page_record::{NewPageRecord, PageRecord};
use crate::domain::models::period::PeriodIdentifier;
use crate::utils::errors::StorageError;
use async_trait::async_trait;
use chrono::Duration;

/// 页面存储特质
///
/// 以立法期为键的只追加存储。同一立法期可能有多条记录，
/// 查询总是返回窗口内最新的一条。
#[async_trait]
pub trait PageStore: Send + Sync {
    /// 查找该立法期在新鲜度窗口内最新的记录
    async fn find_fresh_by_period(
        &self,
        period: &PeriodIdentifier,
        window: Duration,
    ) -> Result<Option<PageRecord>, StorageError>;

    /// 查找窗口内最新的非立法期记录（`period` 为空）
    async fn find_fresh_unscoped(&self, window: Duration)
        -> Result<Option<PageRecord>, StorageError>;

    /// 写入一条新记录
    async fn insert(&self, record: NewPageRecord) -> Result<PageRecord, StorageError>;

    /// 是否存在该立法期的记录（不论新旧）
    async fn exists_for_period(&self, period: &PeriodIdentifier) -> Result<bool, StorageError>;
}
