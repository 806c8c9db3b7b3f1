// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use congreso_scraper::engines::traits::{
    BrowserSession, Dropdown, DropdownOption, EngineError, SessionFactory,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 脚本化的国会网站
///
/// 所有会话共享同一份计数器，用于断言浏览器交互次数
pub struct FakeSite {
    pub labels: Vec<String>,
    pub initially_selected: String,
    /// 为假时选项的选中状态不可读
    pub reports_selection: bool,
    /// 为真时选择立法期后表格不再出现
    pub reload_times_out: bool,
    /// 模拟页面加载耗时
    pub load_latency: Duration,

    pub sessions_created: AtomicUsize,
    pub loads: AtomicUsize,
    pub scans: AtomicUsize,
    pub selections: AtomicUsize,
    pub terminations: AtomicUsize,
}

impl FakeSite {
    pub fn new(labels: &[&str]) -> Self {
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            initially_selected: labels.first().map(|l| l.trim().to_string()).unwrap_or_default(),
            reports_selection: true,
            reload_times_out: false,
            load_latency: Duration::ZERO,
            sessions_created: AtomicUsize::new(0),
            loads: AtomicUsize::new(0),
            scans: AtomicUsize::new(0),
            selections: AtomicUsize::new(0),
            terminations: AtomicUsize::new(0),
        }
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    /// 会话交互总数（创建不计）
    pub fn interactions(&self) -> usize {
        Self::count(&self.loads) + Self::count(&self.scans) + Self::count(&self.selections)
    }

    pub fn page_for(period: &str) -> String {
        format!(
            r#"<html><body>
                 <table>
                   <tr><th>#</th><th>Congresista</th><th>Grupo</th><th>Correo</th></tr>
                   <tr><td>1</td><td><a href="/c/1">Miembro de {period}</a></td><td>Grupo</td><td></td></tr>
                 </table>
               </body></html>"#
        )
    }
}

pub struct FakeSessionFactory {
    pub site: Arc<FakeSite>,
}

#[async_trait]
impl SessionFactory for FakeSessionFactory {
    async fn create(&self) -> Result<Box<dyn BrowserSession>, EngineError> {
        self.site.sessions_created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            site: self.site.clone(),
            selected: self.site.initially_selected.clone(),
            table_visible: false,
        }))
    }
}

struct FakeSession {
    site: Arc<FakeSite>,
    selected: String,
    table_visible: bool,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn load(&mut self, _url: &str) -> Result<(), EngineError> {
        self.site.loads.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.site.load_latency).await;
        self.table_visible = true;
        Ok(())
    }

    async fn wait_for_element(
        &mut self,
        _selector: &str,
        _timeout: Duration,
    ) -> Result<(), EngineError> {
        if self.table_visible {
            Ok(())
        } else {
            Err(EngineError::Timeout)
        }
    }

    async fn find_dropdown(&mut self, selector: &str) -> Result<Dropdown, EngineError> {
        self.site.scans.fetch_add(1, Ordering::SeqCst);
        let options = self
            .site
            .labels
            .iter()
            .map(|label| {
                let selected = self
                    .site
                    .reports_selection
                    .then(|| label.trim() == self.selected);
                DropdownOption::new(label.clone(), selected)
            })
            .collect();

        Ok(Dropdown {
            selector: selector.to_string(),
            options,
        })
    }

    async fn select_by_visible_text(
        &mut self,
        _dropdown: &Dropdown,
        text: &str,
    ) -> Result<(), EngineError> {
        self.site.selections.fetch_add(1, Ordering::SeqCst);
        if !self.site.labels.iter().any(|l| l.trim() == text) {
            return Err(EngineError::ElementNotFound(text.to_string()));
        }
        self.selected = text.to_string();
        self.table_visible = !self.site.reload_times_out;
        tokio::time::sleep(self.site.load_latency).await;
        Ok(())
    }

    async fn current_page_source(&mut self) -> Result<String, EngineError> {
        Ok(FakeSite::page_for(&self.selected))
    }

    async fn terminate(&mut self) -> Result<(), EngineError> {
        self.site.terminations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
