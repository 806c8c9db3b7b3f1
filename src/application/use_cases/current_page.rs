// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::member::CongressMember;
use crate::domain::models::period::ParliamentaryPeriod;
use crate::domain::services::current_page_cache::CurrentPageCache;
use crate::domain::services::document_parser::{parse_members, parse_period_options};
use crate::utils::errors::FetchError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 当前页面用例
///
/// 基于不选择立法期的默认页面，列出可选立法期或解析当前议员
pub struct CurrentPageUseCase {
    cache: Arc<CurrentPageCache>,
    period_selector: String,
}

impl CurrentPageUseCase {
    pub fn new(cache: Arc<CurrentPageCache>, period_selector: impl Into<String>) -> Self {
        Self {
            cache,
            period_selector: period_selector.into(),
        }
    }

    /// 下拉框中的全部立法期，按页面顺序去重
    pub async fn periods(&self) -> Result<Vec<ParliamentaryPeriod>, FetchError> {
        let html = self.cache.fetch_current_page().await?;
        let labels = parse_period_options(&html, &self.period_selector)?;

        let mut periods: Vec<ParliamentaryPeriod> = Vec::with_capacity(labels.len());
        for label in labels {
            let Ok(period) = ParliamentaryPeriod::parse(&label) else {
                continue;
            };
            if !periods.iter().any(|p| p.id == period.id) {
                periods.push(period);
            }
        }
        Ok(periods)
    }

    pub async fn members(&self) -> Result<Vec<CongressMember>, FetchError> {
        let html = self.cache.fetch_current_page().await?;
        Ok(parse_members(&html, self.cache.base_url())?)
    }
}

/// 按议会党团统计人数，按人数降序、党团名升序排列
pub fn members_per_group(members: &[CongressMember]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for member in members {
        *counts.entry(member.parliamentary_group.as_str()).or_default() += 1;
    }

    let mut summary: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(group, count)| (group.to_string(), count))
        .collect();
    summary.sort_by(|a, b| b.1.cmp(&a.1));
    summary
}
