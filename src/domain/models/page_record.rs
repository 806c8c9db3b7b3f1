// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::period::PeriodIdentifier;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 页面记录
///
/// 一次成功抓取的原始页面。记录只追加，不会被修改；
/// 同一立法期可能存在多条记录，只有最新且新鲜的一条有效。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// 存储分配的记录ID
    pub id: i64,
    /// 对应的立法期，非立法期抓取时为空
    pub period: Option<PeriodIdentifier>,
    /// 原始页面HTML
    pub content: String,
    /// 写入时间
    pub fetched_at: DateTime<Utc>,
}

/// 待写入的页面记录
#[derive(Debug, Clone, PartialEq)]
pub struct NewPageRecord {
    pub period: Option<PeriodIdentifier>,
    pub content: String,
    pub fetched_at: DateTime<Utc>,
}

impl NewPageRecord {
    /// 以当前时间创建待写入记录
    pub fn new(period: Option<PeriodIdentifier>, content: String) -> Self {
        Self {
            period,
            content,
            fetched_at: Utc::now(),
        }
    }
}

/// 新鲜度策略
///
/// 记录在 `now - fetched_at < window` 时视为新鲜，恰好在窗口边缘的记录视为过期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    window: Duration,
}

impl FreshnessPolicy {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// 新鲜记录必须晚于该时间点；窗口超出可表示范围时取最早时间
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn is_fresh(&self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        fetched_at > self.cutoff(now)
    }
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::new(Duration::hours(24))
    }
}
