// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::period::PeriodIdentifier;
use crate::engines::traits::EngineError;
use sea_orm::DbErr;
use std::time::Duration;
use thiserror::Error;

/// 页面存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),
}

/// HTML解析错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// 页面中没有成员表格
    #[error("Member table not found on page")]
    TableNotFound,

    /// 页面中没有立法期下拉框
    #[error("Period dropdown '{0}' not found on page")]
    PeriodSelectNotFound(String),

    /// CSS选择器无效
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// 立法期页面抓取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 基础页面或重新加载后的页面在超时内未出现表格
    #[error("Page {url} did not become ready within {timeout:?} (period: {period:?})")]
    PageLoadTimeout {
        url: String,
        period: Option<PeriodIdentifier>,
        timeout: Duration,
    },

    /// 下拉框中没有与请求匹配的选项
    #[error("Period '{period}' not found in dropdown ({} options scanned)", .available.len())]
    PeriodNotFound {
        period: PeriodIdentifier,
        available: Vec<String>,
    },

    /// 浏览器自动化或网络层失败
    #[error("Transport failure for {url} (period: {period:?}): {source}")]
    Transport {
        url: String,
        period: Option<PeriodIdentifier>,
        #[source]
        source: EngineError,
    },

    /// 页面存储读取失败
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// 抓取成功但页面无法解析
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

impl FetchError {
    /// 判断错误是否值得由调用方重试
    ///
    /// 未找到立法期、存储错误和解析错误不重试
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::PageLoadTimeout { .. } => true,
            FetchError::Transport { source, .. } => source.is_retryable(),
            FetchError::PeriodNotFound { .. }
            | FetchError::Storage(_)
            | FetchError::Parse(_) => false,
        }
    }

    /// 用于指标标签的错误类别
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::PageLoadTimeout { .. } => "page_load_timeout",
            FetchError::PeriodNotFound { .. } => "period_not_found",
            FetchError::Transport { .. } => "transport",
            FetchError::Storage(_) => "storage",
            FetchError::Parse(_) => "parse",
        }
    }
}
