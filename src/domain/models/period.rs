// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// Year ranges look like "2021 - 2026" or "1992 -1995"
static YEAR_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})\s*-\s*(\d{4})").expect("invalid regex: year range"));

/// 立法期标识错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Period identifier must not be empty")]
    Empty,
}

/// 立法期标识
///
/// 与下拉框中可见文本对应的不透明字符串，例如 "Parlamentario 2021 - 2026"。
/// 构造时去除首尾空白；比较区分大小写。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodIdentifier(String);

impl PeriodIdentifier {
    /// 创建立法期标识
    ///
    /// # 参数
    ///
    /// * `value` - 立法期名称，首尾空白会被去除
    ///
    /// # 返回值
    ///
    /// * `Ok(PeriodIdentifier)` - 合法的标识
    /// * `Err(PeriodError::Empty)` - 去除空白后为空
    pub fn new(value: impl AsRef<str>) -> Result<Self, PeriodError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PeriodError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 判断下拉框选项文本是否指向该立法期
    ///
    /// 选项文本先去除首尾空白，再做区分大小写的精确比较
    pub fn matches_label(&self, label: &str) -> bool {
        label.trim() == self.0
    }
}

impl fmt::Display for PeriodIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl TryFrom<String> for PeriodIdentifier {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PeriodIdentifier> for String {
    fn from(value: PeriodIdentifier) -> Self {
        value.0
    }
}

impl std::str::FromStr for PeriodIdentifier {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// 立法期信息
///
/// 由下拉框选项解析而来，附带起止年份
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParliamentaryPeriod {
    /// 立法期标识
    pub id: PeriodIdentifier,
    /// 起始年份
    pub start_year: Option<i32>,
    /// 结束年份
    pub end_year: Option<i32>,
}

impl ParliamentaryPeriod {
    /// 从下拉框标签解析立法期
    pub fn parse(label: &str) -> Result<Self, PeriodError> {
        let id = PeriodIdentifier::new(label)?;
        let (start_year, end_year) = match YEAR_RANGE.captures(id.as_str()) {
            Some(caps) => (
                caps.get(1).and_then(|m| m.as_str().parse().ok()),
                caps.get(2).and_then(|m| m.as_str().parse().ok()),
            ),
            None => (None, None),
        };

        Ok(Self {
            id,
            start_year,
            end_year,
        })
    }

    /// 判断给定年份是否落在该立法期内
    pub fn covers_year(&self, year: i32) -> bool {
        match (self.start_year, self.end_year) {
            (Some(start), Some(end)) => start <= year && year <= end,
            _ => false,
        }
    }
}
