// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod fake_browser;

use congreso_scraper::domain::models::page_record::FreshnessPolicy;
use congreso_scraper::domain::services::period_fetch_cache::{FetchOptions, PeriodFetchCache};
use congreso_scraper::engines::session::ReloadTiming;
use congreso_scraper::infrastructure::repositories::page_store_impl::PageStoreImpl;
use congreso_scraper::domain::repositories::page_store::PageStore;
use fake_browser::{FakeSessionFactory, FakeSite};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};
use std::sync::Arc;
use std::time::Duration;

pub const BASE_URL: &str = "https://www.congreso.gob.pe/pleno/congresistas/";

pub fn fetch_options() -> FetchOptions {
    FetchOptions {
        base_url: BASE_URL.to_string(),
        period_selector: "select[name='idRegistroPadre'], #idRegistroPadre".to_string(),
        ready_selector: "table".to_string(),
        page_load_timeout: Duration::from_millis(50),
        reload: ReloadTiming {
            settle_delay: Duration::ZERO,
            post_reload_delay: Duration::ZERO,
            ready_timeout: Duration::from_millis(50),
        },
        freshness: FreshnessPolicy::default(),
    }
}

pub fn period_cache(site: &Arc<FakeSite>, store: Arc<dyn PageStore>) -> PeriodFetchCache {
    let factory = Arc::new(FakeSessionFactory { site: site.clone() });
    PeriodFetchCache::new(factory, store, fetch_options())
}

/// 创建迁移完成的内存SQLite存储
///
/// 内存数据库按连接隔离，因此连接池只保留一个连接
pub async fn sqlite_store() -> Arc<PageStoreImpl> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("Failed to connect to in-memory SQLite");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    Arc::new(PageStoreImpl::new(Arc::new(db)))
}
