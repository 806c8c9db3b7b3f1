// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::sqlite_store;
use congreso_scraper::application::use_cases::current_page::CurrentPageUseCase;
use congreso_scraper::domain::models::page_record::FreshnessPolicy;
use congreso_scraper::domain::services::current_page_cache::CurrentPageCache;
use congreso_scraper::engines::http_fetcher::HttpPageFetcher;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"
<html><body>
  <form>
    <select name="idRegistroPadre">
      <option value="0">Todos</option>
      <option value="1" selected>Parlamentario 2021 - 2026</option>
      <option value="2">Parlamentario 2016 - 2021</option>
    </select>
  </form>
  <table>
    <tr><th>Foto</th><th>Congresista</th><th>Grupo</th><th>Correo</th></tr>
    <tr><td></td><td><a href="/congresista/1">Ana Pérez</a></td><td>Grupo Azul</td><td><a href="mailto:ana@congreso.gob.pe">ana@congreso.gob.pe</a></td></tr>
  </table>
</body></html>
"#;

/// HTTP路径只请求一次，第二次从SQLite存储返回
#[tokio::test]
async fn test_current_page_is_fetched_once_and_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pleno/congresistas/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = format!("{}/pleno/congresistas/", server.uri());
    let fetcher = Arc::new(HttpPageFetcher::new("congreso-test/1.0", Duration::from_secs(5)).unwrap());
    let store = sqlite_store().await;
    let cache = Arc::new(CurrentPageCache::new(
        fetcher,
        store,
        base_url,
        FreshnessPolicy::default(),
    ));
    let current = CurrentPageUseCase::new(cache, "select[name='idRegistroPadre'], #idRegistroPadre");

    let periods = current.periods().await.unwrap();
    let labels: Vec<&str> = periods.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(labels, vec!["Parlamentario 2021 - 2026", "Parlamentario 2016 - 2021"]);

    let members = current.members().await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].email, "ana@congreso.gob.pe");
    assert_eq!(members[0].profile_url, format!("{}/congresista/1", server.uri()));
}
