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

use crate::domain::models::page_record::{FreshnessPolicy, NewPageRecord};
use crate::domain::models::period::PeriodIdentifier;
use crate::domain::repositories::page_store::PageStore;
use crate::engines::session::{ReloadTiming, ScopedSession};
use crate::engines::traits::{EngineError, SessionFactory};
use crate::utils::errors::FetchError;
use chrono::Utc;
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// 缓存协调器选项
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// 议员列表页面URL
    pub base_url: String,
    /// 立法期下拉框选择器
    pub period_selector: String,
    /// 页面就绪信号选择器
    pub ready_selector: String,
    /// 基础页面加载超时
    pub page_load_timeout: Duration,
    /// 选择立法期后的等待时间
    pub reload: ReloadTiming,
    /// 新鲜度策略
    pub freshness: FreshnessPolicy,
}

/// 页面来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    /// 存储中的新鲜记录
    Cache,
    /// 浏览器实时抓取
    Live,
}

/// 抓取到的页面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub content: String,
    pub source: PageSource,
}

/// 立法期页面缓存
///
/// 对给定立法期返回原始页面：存储中有新鲜记录时直接返回，
/// 否则驱动浏览器会话在下拉框中选择该立法期、等待重新加载、
/// 抓取页面源码并写入存储。每个立法期在新鲜度窗口内最多实时抓取一次。
pub struct PeriodFetchCache {
    sessions: Arc<dyn SessionFactory>,
    store: Arc<dyn PageStore>,
    options: FetchOptions,
}

impl PeriodFetchCache {
    /// 创建新的缓存协调器
    ///
    /// # 参数
    ///
    /// * `sessions` - 浏览器会话工厂，每次实时抓取都会获取独立会话
    /// * `store` - 页面存储
    /// * `options` - 协调器选项
    pub fn new(
        sessions: Arc<dyn SessionFactory>,
        store: Arc<dyn PageStore>,
        options: FetchOptions,
    ) -> Self {
        Self {
            sessions,
            store,
            options,
        }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    pub fn freshness(&self) -> &FreshnessPolicy {
        &self.options.freshness
    }

    /// 获取立法期页面内容
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 页面HTML
    /// * `Err(FetchError)` - 超时、立法期不存在或传输失败
    pub async fn fetch_page(&self, period: &PeriodIdentifier) -> Result<String, FetchError> {
        self.fetch_page_detailed(period).await.map(|page| page.content)
    }

    /// 获取立法期页面，并标明来自缓存还是实时抓取
    pub async fn fetch_page_detailed(
        &self,
        period: &PeriodIdentifier,
    ) -> Result<FetchedPage, FetchError> {
        let start = Instant::now();
        let result = self.fetch_with_own_session(period).await;
        self.observe(period, &result, start);
        result
    }

    /// 按顺序获取多个立法期页面
    ///
    /// 所有未命中缓存的立法期共用一个会话；会话在超时或传输失败后
    /// 被释放，下一个未命中时重新获取。结束时总会释放会话。
    pub async fn fetch_pages(
        &self,
        periods: &[PeriodIdentifier],
    ) -> Vec<(PeriodIdentifier, Result<FetchedPage, FetchError>)> {
        let mut shared: Option<ScopedSession> = None;
        let mut results = Vec::with_capacity(periods.len());

        for period in periods {
            let start = Instant::now();
            let result = self.fetch_with_shared_session(&mut shared, period).await;
            self.observe(period, &result, start);
            results.push((period.clone(), result));
        }

        if let Some(session) = shared.take() {
            session.release().await;
        }

        results
    }

    async fn fetch_with_own_session(
        &self,
        period: &PeriodIdentifier,
    ) -> Result<FetchedPage, FetchError> {
        if let Some(content) = self.lookup(period).await {
            return Ok(FetchedPage {
                content,
                source: PageSource::Cache,
            });
        }

        let mut session = self.acquire(period).await?;
        let captured = self.capture(&mut session, period).await;
        session.release().await;

        let content = captured?;
        self.persist(period, &content).await;

        Ok(FetchedPage {
            content,
            source: PageSource::Live,
        })
    }

    async fn fetch_with_shared_session(
        &self,
        shared: &mut Option<ScopedSession>,
        period: &PeriodIdentifier,
    ) -> Result<FetchedPage, FetchError> {
        if let Some(content) = self.lookup(period).await {
            return Ok(FetchedPage {
                content,
                source: PageSource::Cache,
            });
        }

        let mut session = match shared.take() {
            Some(session) => session,
            None => self.acquire(period).await?,
        };

        let captured = self.capture(&mut session, period).await;
        match &captured {
            // Page state is unknown after these; start the next period from scratch
            Err(FetchError::PageLoadTimeout { .. }) | Err(FetchError::Transport { .. }) => {
                session.release().await;
            }
            _ => *shared = Some(session),
        }

        let content = captured?;
        self.persist(period, &content).await;

        Ok(FetchedPage {
            content,
            source: PageSource::Live,
        })
    }

    /// 查询存储中的新鲜记录
    ///
    /// 存储读取失败按未命中处理，继续实时抓取
    async fn lookup(&self, period: &PeriodIdentifier) -> Option<String> {
        let freshness = self.options.freshness;
        let record = match self
            .store
            .find_fresh_by_period(period, freshness.window())
            .await
        {
            Ok(record) => record.filter(|record| freshness.is_fresh(record.fetched_at, Utc::now())),
            Err(e) => {
                counter!("period_fetch_failures_total", "kind" => "storage").increment(1);
                warn!(period = %period, "Store lookup failed, fetching live: {}", e);
                None
            }
        };

        match record {
            Some(record) => {
                counter!("period_cache_requests_total", "scope" => "period", "outcome" => "hit")
                    .increment(1);
                debug!(
                    period = %period,
                    record_id = record.id,
                    fetched_at = %record.fetched_at,
                    "Serving period page from cache"
                );
                Some(record.content)
            }
            None => {
                counter!("period_cache_requests_total", "scope" => "period", "outcome" => "miss")
                    .increment(1);
                info!(period = %period, "No fresh page stored, fetching live");
                None
            }
        }
    }

    async fn acquire(&self, period: &PeriodIdentifier) -> Result<ScopedSession, FetchError> {
        ScopedSession::acquire(self.sessions.as_ref())
            .await
            .map_err(|source| self.transport_error(period, source))
    }

    /// 驱动会话选择立法期并抓取页面源码
    async fn capture(
        &self,
        session: &mut ScopedSession,
        period: &PeriodIdentifier,
    ) -> Result<String, FetchError> {
        let options = &self.options;

        session
            .ensure_loaded(
                &options.base_url,
                &options.ready_selector,
                options.page_load_timeout,
            )
            .await
            .map_err(|e| self.engine_error(period, e, options.page_load_timeout))?;

        let dropdown = session
            .find_dropdown(&options.period_selector)
            .await
            .map_err(|e| self.transport_error(period, e))?;

        let option = dropdown
            .options
            .iter()
            .find(|option| period.matches_label(&option.text))
            .ok_or_else(|| FetchError::PeriodNotFound {
                period: period.clone(),
                available: dropdown.labels(),
            })?;

        // Only a confirmed selection skips the reload
        if option.selected == Some(true) {
            debug!(period = %period, "Period already selected, capturing current page");
            session.mark_selected(period);
        } else {
            info!(period = %period, "Selecting period and waiting for reload");
            session
                .select_period(&dropdown, period, &options.ready_selector, options.reload)
                .await
                .map_err(|e| self.engine_error(period, e, options.reload.ready_timeout))?;
        }

        session
            .page_source()
            .await
            .map_err(|e| self.transport_error(period, e))
    }

    /// 写入新记录
    ///
    /// 写入前重新检查存储；若其他调用方已写入新鲜记录则跳过。
    /// 写入失败只记录警告，抓取结果仍返回给调用方。
    async fn persist(&self, period: &PeriodIdentifier, content: &str) {
        let freshness = self.options.freshness;
        match self
            .store
            .find_fresh_by_period(period, freshness.window())
            .await
        {
            Ok(Some(existing)) if freshness.is_fresh(existing.fetched_at, Utc::now()) => {
                counter!("period_cache_store_skipped_total").increment(1);
                debug!(
                    period = %period,
                    record_id = existing.id,
                    "Fresh page stored concurrently, skipping write"
                );
                return;
            }
            Ok(_) => {}
            Err(e) => warn!(period = %period, "Re-check before write failed: {}", e),
        }

        let record = NewPageRecord::new(Some(period.clone()), content.to_string());
        match self.store.insert(record).await {
            Ok(stored) => info!(period = %period, record_id = stored.id, "Stored period page"),
            Err(e) => warn!(
                period = %period,
                "Failed to store fetched page, returning unsaved capture: {}", e
            ),
        }
    }

    fn engine_error(
        &self,
        period: &PeriodIdentifier,
        error: EngineError,
        timeout: Duration,
    ) -> FetchError {
        match error {
            EngineError::Timeout => FetchError::PageLoadTimeout {
                url: self.options.base_url.clone(),
                period: Some(period.clone()),
                timeout,
            },
            other => self.transport_error(period, other),
        }
    }

    fn transport_error(&self, period: &PeriodIdentifier, source: EngineError) -> FetchError {
        FetchError::Transport {
            url: self.options.base_url.clone(),
            period: Some(period.clone()),
            source,
        }
    }

    fn observe(
        &self,
        period: &PeriodIdentifier,
        result: &Result<FetchedPage, FetchError>,
        start: Instant,
    ) {
        histogram!("period_fetch_duration_seconds").record(start.elapsed().as_secs_f64());
        if let Err(e) = result {
            counter!("period_fetch_failures_total", "kind" => e.kind()).increment(1);
            warn!(period = %period, kind = e.kind(), "Period fetch failed: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "period_fetch_cache_test.rs"]
mod tests;
