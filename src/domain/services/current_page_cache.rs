// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::page_record::{FreshnessPolicy, NewPageRecord};
use crate::domain::repositories::page_store::PageStore;
use crate::engines::traits::PageFetcher;
use crate::utils::errors::FetchError;
use chrono::Utc;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 当前页面缓存
///
/// 不选择立法期，直接以HTTP获取基础页面（网站默认展示当前立法期）。
/// 记录以空立法期写入存储，与立法期页面互不混用。
pub struct CurrentPageCache {
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn PageStore>,
    base_url: String,
    freshness: FreshnessPolicy,
}

impl CurrentPageCache {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        store: Arc<dyn PageStore>,
        base_url: impl Into<String>,
        freshness: FreshnessPolicy,
    ) -> Self {
        Self {
            fetcher,
            store,
            base_url: base_url.into(),
            freshness,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 获取基础页面
    ///
    /// 存储中有新鲜的非立法期记录时直接返回，否则通过HTTP获取并写入存储。
    /// 存储读取失败时同样走HTTP。
    pub async fn fetch_current_page(&self) -> Result<String, FetchError> {
        let cached = match self.store.find_fresh_unscoped(self.freshness.window()).await {
            Ok(record) => {
                record.filter(|record| self.freshness.is_fresh(record.fetched_at, Utc::now()))
            }
            Err(e) => {
                warn!("Current page lookup failed, fetching live: {}", e);
                None
            }
        };

        if let Some(record) = cached {
            counter!("period_cache_requests_total", "scope" => "current", "outcome" => "hit")
                .increment(1);
            debug!(record_id = record.id, "Serving current page from cache");
            return Ok(record.content);
        }
        counter!("period_cache_requests_total", "scope" => "current", "outcome" => "miss")
            .increment(1);

        info!(url = %self.base_url, fetcher = self.fetcher.name(), "Fetching current page");
        let content =
            self.fetcher
                .fetch(&self.base_url)
                .await
                .map_err(|source| FetchError::Transport {
                    url: self.base_url.clone(),
                    period: None,
                    source,
                })?;

        if let Err(e) = self
            .store
            .insert(NewPageRecord::new(None, content.clone()))
            .await
        {
            warn!("Failed to store current page: {}", e);
        }

        Ok(content)
    }
}
