// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::sqlite_store;
use chrono::{Duration, Utc};
use congreso_scraper::domain::models::page_record::NewPageRecord;
use congreso_scraper::domain::models::period::PeriodIdentifier;
use congreso_scraper::domain::repositories::page_store::PageStore;

fn period(name: &str) -> PeriodIdentifier {
    PeriodIdentifier::new(name).unwrap()
}

fn record(period: Option<&PeriodIdentifier>, content: &str, age: Duration) -> NewPageRecord {
    NewPageRecord {
        period: period.cloned(),
        content: content.to_string(),
        fetched_at: Utc::now() - age,
    }
}

/// 同一立法期多条记录时返回窗口内最新的一条
#[tokio::test]
async fn test_sqlite_returns_latest_fresh_record() {
    let store = sqlite_store().await;
    let p = period("Parlamentario 2016 - 2021");

    let older = store
        .insert(record(Some(&p), "older", Duration::hours(3)))
        .await
        .unwrap();
    let newer = store
        .insert(record(Some(&p), "newer", Duration::hours(1)))
        .await
        .unwrap();
    assert!(newer.id > older.id);
    assert_eq!(newer.period.as_ref(), Some(&p));

    let found = store
        .find_fresh_by_period(&p, Duration::hours(24))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, newer.id);
    assert_eq!(found.content, "newer");
}

/// 窗口外的记录不返回，但仍计入存在性检查
#[tokio::test]
async fn test_sqlite_ignores_stale_records() {
    let store = sqlite_store().await;
    let p = period("Parlamentario 2011 - 2016");

    store
        .insert(record(Some(&p), "stale", Duration::hours(30)))
        .await
        .unwrap();

    assert!(store
        .find_fresh_by_period(&p, Duration::hours(24))
        .await
        .unwrap()
        .is_none());
    assert!(store.exists_for_period(&p).await.unwrap());
    assert!(!store
        .exists_for_period(&period("Parlamentario 2006 - 2011"))
        .await
        .unwrap());
}

/// 立法期区分大小写，非立法期记录与立法期记录互不可见
#[tokio::test]
async fn test_sqlite_period_scoping() {
    let store = sqlite_store().await;
    let ccd = period("CCD 1992 -1995");

    store
        .insert(record(Some(&ccd), "<html>ccd</html>", Duration::minutes(5)))
        .await
        .unwrap();
    store
        .insert(record(None, "<html>base</html>", Duration::minutes(10)))
        .await
        .unwrap();

    assert!(store
        .find_fresh_by_period(&period("ccd 1992 -1995"), Duration::hours(24))
        .await
        .unwrap()
        .is_none());

    let unscoped = store
        .find_fresh_unscoped(Duration::hours(24))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unscoped.content, "<html>base</html>");
    assert!(unscoped.period.is_none());
}
