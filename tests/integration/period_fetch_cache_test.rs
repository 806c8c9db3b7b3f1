// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::fake_browser::FakeSite;
use super::helpers::{period_cache, sqlite_store};
use congreso_scraper::domain::models::page_record::NewPageRecord;
use congreso_scraper::domain::models::period::PeriodIdentifier;
use congreso_scraper::domain::repositories::page_store::PageStore;
use congreso_scraper::domain::services::period_fetch_cache::PageSource;
use congreso_scraper::infrastructure::repositories::memory_page_store::MemoryPageStore;
use congreso_scraper::utils::errors::FetchError;
use std::sync::Arc;
use std::time::Duration;

const CURRENT: &str = "Parlamentario 2021 - 2026";
const PREVIOUS: &str = "Parlamentario 2016 - 2021";
const CCD: &str = "CCD 1992 -1995";

fn period(name: &str) -> PeriodIdentifier {
    PeriodIdentifier::new(name).unwrap()
}

fn site() -> FakeSite {
    FakeSite::new(&[CURRENT, PREVIOUS, CCD])
}

/// 新鲜记录直接返回，不产生任何浏览器交互
#[tokio::test]
async fn test_fresh_record_needs_no_browser() {
    let site = Arc::new(site());
    let store = sqlite_store().await;
    store
        .insert(NewPageRecord::new(
            Some(period(PREVIOUS)),
            "<html>stored</html>".to_string(),
        ))
        .await
        .unwrap();

    let cache = period_cache(&site, store.clone());
    let page = cache.fetch_page_detailed(&period(PREVIOUS)).await.unwrap();

    assert_eq!(page.content, "<html>stored</html>");
    assert_eq!(page.source, PageSource::Cache);
    assert_eq!(FakeSite::count(&site.sessions_created), 0);
    assert_eq!(site.interactions(), 0);
}

/// 未命中时：一次扫描、一次选择、一次写入，会话被终止
#[tokio::test]
async fn test_miss_fetches_once_and_persists() {
    let site = Arc::new(site());
    let store = sqlite_store().await;
    let cache = period_cache(&site, store.clone());

    let content = cache.fetch_page(&period(PREVIOUS)).await.unwrap();
    assert_eq!(content, FakeSite::page_for(PREVIOUS));

    assert_eq!(FakeSite::count(&site.scans), 1);
    assert_eq!(FakeSite::count(&site.selections), 1);
    assert_eq!(FakeSite::count(&site.terminations), 1);
    assert!(store.exists_for_period(&period(PREVIOUS)).await.unwrap());

    // Second call within the window is served from the store
    let again = cache.fetch_page_detailed(&period(PREVIOUS)).await.unwrap();
    assert_eq!(again.source, PageSource::Cache);
    assert_eq!(FakeSite::count(&site.sessions_created), 1);
}

/// 下拉框选项文本带首尾空白时仍能匹配
#[tokio::test]
async fn test_option_whitespace_is_ignored() {
    let site = Arc::new(FakeSite::new(&[" Parlamentario 2021 - 2026 ", PREVIOUS]));
    let store = Arc::new(MemoryPageStore::new());
    let cache = period_cache(&site, store.clone());

    let content = cache.fetch_page(&period(CURRENT)).await.unwrap();

    assert_eq!(content, FakeSite::page_for(CURRENT));
    // Already selected, so no reload was triggered
    assert_eq!(FakeSite::count(&site.selections), 0);
    assert_eq!(store.count_for_period(&period(CURRENT)), 1);
}

/// 选中状态不可读时显式选择
#[tokio::test]
async fn test_unknown_selection_state_selects_explicitly() {
    let mut fake = site();
    fake.reports_selection = false;
    let site = Arc::new(fake);
    let cache = period_cache(&site, Arc::new(MemoryPageStore::new()));

    cache.fetch_page(&period(CURRENT)).await.unwrap();

    assert_eq!(FakeSite::count(&site.selections), 1);
}

/// 大小写不同的请求既不命中存储也不匹配下拉框
#[tokio::test]
async fn test_period_matching_is_case_sensitive() {
    let site = Arc::new(site());
    let store = Arc::new(MemoryPageStore::new());
    store
        .insert(NewPageRecord::new(Some(period(CCD)), "<html>ccd</html>".to_string()))
        .await
        .unwrap();
    let cache = period_cache(&site, store.clone());

    let err = cache.fetch_page(&period("ccd 1992 -1995")).await.unwrap_err();

    match err {
        FetchError::PeriodNotFound { available, .. } => {
            assert_eq!(available, vec![CURRENT, PREVIOUS, CCD]);
        }
        other => panic!("expected PeriodNotFound, got {:?}", other),
    }
    assert_eq!(store.records().len(), 1);
    assert_eq!(FakeSite::count(&site.terminations), 1);
}

/// 重新加载超时：返回超时错误，会话终止，不写入
#[tokio::test]
async fn test_reload_timeout_stores_nothing() {
    let mut fake = site();
    fake.reload_times_out = true;
    let site = Arc::new(fake);
    let store = sqlite_store().await;
    let cache = period_cache(&site, store.clone());

    let err = cache.fetch_page(&period(PREVIOUS)).await.unwrap_err();

    assert!(matches!(
        err,
        FetchError::PageLoadTimeout {
            period: Some(_),
            ..
        }
    ));
    assert_eq!(FakeSite::count(&site.terminations), 1);
    assert!(!store.exists_for_period(&period(PREVIOUS)).await.unwrap());
}

/// 同一未缓存立法期的两个并发请求各自使用独立会话，均成功，至少写入一条记录
#[tokio::test]
async fn test_concurrent_requests_for_same_period() {
    let mut fake = site();
    fake.load_latency = Duration::from_millis(20);
    let site = Arc::new(fake);
    let store = Arc::new(MemoryPageStore::new());
    let cache = Arc::new(period_cache(&site, store.clone()));
    let target = period(PREVIOUS);

    let (first, second) = tokio::join!(cache.fetch_page(&target), cache.fetch_page(&target));

    assert_eq!(first.unwrap(), FakeSite::page_for(PREVIOUS));
    assert_eq!(second.unwrap(), FakeSite::page_for(PREVIOUS));
    assert_eq!(FakeSite::count(&site.sessions_created), 2);
    assert_eq!(FakeSite::count(&site.terminations), 2);

    let stored = store.count_for_period(&target);
    assert!((1..=2).contains(&stored), "stored {} records", stored);
}

/// 批量抓取共用一个会话，缓存命中的立法期不触发浏览器
#[tokio::test]
async fn test_fetch_pages_shares_one_session() {
    let site = Arc::new(site());
    let store = Arc::new(MemoryPageStore::new());
    store
        .insert(NewPageRecord::new(Some(period(CCD)), "<html>ccd</html>".to_string()))
        .await
        .unwrap();
    let cache = period_cache(&site, store.clone());

    let results = cache
        .fetch_pages(&[period(PREVIOUS), period(CCD), period(CURRENT)])
        .await;

    let sources: Vec<PageSource> = results
        .iter()
        .map(|(_, r)| r.as_ref().unwrap().source)
        .collect();
    assert_eq!(
        sources,
        vec![PageSource::Live, PageSource::Cache, PageSource::Live]
    );
    assert_eq!(FakeSite::count(&site.sessions_created), 1);
    assert_eq!(FakeSite::count(&site.loads), 1);
    assert_eq!(FakeSite::count(&site.terminations), 1);
    assert_eq!(
        results[2].1.as_ref().unwrap().content,
        FakeSite::page_for(CURRENT)
    );
}
