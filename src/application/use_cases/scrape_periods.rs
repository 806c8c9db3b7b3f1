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

use crate::{
    domain::{
        models::{member::CongressMember, period::PeriodIdentifier},
        services::{
            document_parser::parse_members,
            period_fetch_cache::{FetchedPage, PageSource, PeriodFetchCache},
        },
    },
    infrastructure::export::{period_slug, write_members},
    utils::errors::FetchError,
};
use backoff::ExponentialBackoff;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ScrapePeriodsError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Export failed: {0}")]
    Export(#[from] anyhow::Error),
}

/// 单个立法期的处理结果
#[derive(Debug)]
pub struct PeriodSummary {
    pub source: PageSource,
    pub members: Vec<CongressMember>,
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
}

#[derive(Debug)]
pub struct PeriodReport {
    pub period: PeriodIdentifier,
    pub outcome: Result<PeriodSummary, ScrapePeriodsError>,
}

/// 一次批量抓取的汇总
#[derive(Debug, Default)]
pub struct ScrapeReport {
    pub periods: Vec<PeriodReport>,
}

impl ScrapeReport {
    fn count_source(&self, source: PageSource) -> usize {
        self.periods
            .iter()
            .filter(|p| matches!(&p.outcome, Ok(s) if s.source == source))
            .count()
    }

    /// 实时抓取成功的数量
    pub fn fetched(&self) -> usize {
        self.count_source(PageSource::Live)
    }

    /// 命中缓存的数量
    pub fn cached(&self) -> usize {
        self.count_source(PageSource::Cache)
    }

    pub fn failed(&self) -> usize {
        self.periods.iter().filter(|p| p.outcome.is_err()).count()
    }
}

/// 批量抓取立法期用例
///
/// 按顺序抓取给定立法期，解析议员表格并为每个立法期写出 JSON 和 CSV。
/// 可重试的失败在第一轮结束后按指数退避单独重试。
pub struct ScrapePeriodsUseCase {
    cache: Arc<PeriodFetchCache>,
    output_dir: PathBuf,
    max_retries: u32,
    retry_initial_interval: Duration,
}

impl ScrapePeriodsUseCase {
    pub fn new(cache: Arc<PeriodFetchCache>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache,
            output_dir: output_dir.into(),
            max_retries: 2,
            retry_initial_interval: Duration::from_secs(2),
        }
    }

    /// 设置重试次数和首次重试间隔
    pub fn with_retries(mut self, max_retries: u32, initial_interval: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_initial_interval = initial_interval;
        self
    }

    pub async fn execute(&self, periods: &[PeriodIdentifier]) -> ScrapeReport {
        let first_pass = self.cache.fetch_pages(periods).await;
        let stems = export_stems(periods);

        let mut report = ScrapeReport::default();
        for (period, result) in first_pass {
            let result = match result {
                Err(e) if e.is_retryable() && self.max_retries > 0 => {
                    warn!(period = %period, "Fetch failed, retrying: {}", e);
                    self.fetch_with_retry(&period).await
                }
                other => other,
            };

            let outcome = match result {
                Ok(page) => {
                    let stem = stems
                        .get(&period)
                        .cloned()
                        .unwrap_or_else(|| period_slug(&period));
                    self.export(&period, &stem, page).await
                }
                Err(e) => Err(e.into()),
            };
            report.periods.push(PeriodReport { period, outcome });
        }

        info!(
            fetched = report.fetched(),
            cached = report.cached(),
            failed = report.failed(),
            "Period scrape finished"
        );
        report
    }

    async fn fetch_with_retry(&self, period: &PeriodIdentifier) -> Result<FetchedPage, FetchError> {
        let policy = ExponentialBackoff {
            initial_interval: self.retry_initial_interval,
            max_elapsed_time: None,
            ..ExponentialBackoff::default()
        };

        let attempts = &AtomicU32::new(0);
        let cache = &self.cache;
        let max_retries = self.max_retries;

        backoff::future::retry(policy, move || async move {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            match cache.fetch_page_detailed(period).await {
                Ok(page) => Ok(page),
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    warn!(period = %period, attempt, "Retry failed: {}", e);
                    Err(backoff::Error::transient(e))
                }
                Err(e) => Err(backoff::Error::permanent(e)),
            }
        })
        .await
    }

    async fn export(
        &self,
        period: &PeriodIdentifier,
        stem: &str,
        page: FetchedPage,
    ) -> Result<PeriodSummary, ScrapePeriodsError> {
        let members = parse_members(&page.content, &self.cache.options().base_url)
            .map_err(FetchError::from)?;
        let (json_path, csv_path) =
            write_members(&self.output_dir, stem, &members).await?;

        info!(period = %period, members = members.len(), "Exported period members");
        Ok(PeriodSummary {
            source: page.source,
            members,
            json_path,
            csv_path,
        })
    }
}

/// 为每个立法期分配导出文件名
///
/// 不同立法期的slug相同时（例如只差空格或标点），后出现的追加 `-2`、`-3` 后缀
fn export_stems(periods: &[PeriodIdentifier]) -> HashMap<PeriodIdentifier, String> {
    let mut stems: HashMap<PeriodIdentifier, String> = HashMap::with_capacity(periods.len());
    let mut used: HashSet<String> = HashSet::with_capacity(periods.len());

    for period in periods {
        if stems.contains_key(period) {
            continue;
        }
        let base = period_slug(period);
        let mut stem = base.clone();
        let mut n = 2;
        while used.contains(&stem) {
            stem = format!("{}-{}", base, n);
            n += 1;
        }
        if stem != base {
            warn!(period = %period, stem = %stem, "Export file name taken by another period");
        }
        used.insert(stem.clone());
        stems.insert(period.clone(), stem);
    }
    stems
}

#[cfg(test)]
#[path = "scrape_periods_test.rs"]
mod tests;
