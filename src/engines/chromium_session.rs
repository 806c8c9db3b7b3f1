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

use crate::config::settings::BrowserSettings;
use crate::engines::traits::{
    BrowserSession, Dropdown, DropdownOption, EngineError, SessionFactory,
};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use serde::Deserialize;
use std::time::Duration;
use tokio::task::JoinHandle;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn browser_error(e: impl std::fmt::Display) -> EngineError {
    EngineError::Browser(e.to_string())
}

/// 将字符串编码为 JavaScript 字面量
fn js_literal(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// 页面脚本返回的下拉框扫描结果
#[derive(Deserialize)]
struct DropdownScan {
    found: bool,
    options: Vec<DropdownOption>,
}

/// Chromium 会话工厂
///
/// 基于chromiumoxide，每次创建都会启动（或连接）独立的浏览器实例
pub struct ChromiumSessionFactory {
    headless: bool,
    remote_debugging_url: Option<String>,
    window_size: (u32, u32),
    request_timeout: Duration,
    user_agent: String,
}

impl ChromiumSessionFactory {
    pub fn new(settings: &BrowserSettings, user_agent: impl Into<String>) -> Self {
        Self {
            headless: settings.headless,
            remote_debugging_url: settings.remote_debugging_url.clone(),
            window_size: (settings.window_width, settings.window_height),
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
            user_agent: user_agent.into(),
        }
    }

    fn launch_config(&self) -> Result<BrowserConfig, EngineError> {
        let (width, height) = self.window_size;
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.request_timeout)
            .window_size(width, height)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", self.user_agent));

        if !self.headless {
            builder = builder.with_head();
        }

        builder.build().map_err(EngineError::Browser)
    }
}

#[async_trait]
impl SessionFactory for ChromiumSessionFactory {
    async fn create(&self) -> Result<Box<dyn BrowserSession>, EngineError> {
        let (browser, mut handler) = if let Some(ref url) = self.remote_debugging_url {
            tracing::info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url).await.map_err(|e| {
                EngineError::Browser(format!("Failed to connect to remote Chrome: {}", e))
            })?
        } else {
            Browser::launch(self.launch_config()?)
                .await
                .map_err(browser_error)?
        };

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(browser_error)?;
        page.set_user_agent(self.user_agent.as_str())
            .await
            .map_err(browser_error)?;

        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler_task,
            owns_browser: self.remote_debugging_url.is_none(),
        }))
    }
}

/// Chromium 浏览器会话
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    /// 本地启动的浏览器在终止时关闭；远程浏览器只关闭页面
    owns_browser: bool,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn load(&mut self, url: &str) -> Result<(), EngineError> {
        self.page.goto(url).await.map_err(browser_error)?;
        Ok(())
    }

    async fn wait_for_element(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), EngineError> {
        let page = &self.page;
        tokio::time::timeout(timeout, async {
            loop {
                if page.find_element(selector).await.is_ok() {
                    return;
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        })
        .await
        .map_err(|_| EngineError::Timeout)
    }

    async fn find_dropdown(&mut self, selector: &str) -> Result<Dropdown, EngineError> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({selector});
                if (!el || !el.options) return {{ found: false, options: [] }};
                const options = Array.from(el.options).map(o => ({{ text: o.text, selected: o.selected }}));
                return {{ found: true, options }};
            }})()"#,
            selector = js_literal(selector)
        );

        let scan: DropdownScan = self
            .page
            .evaluate(script.as_str())
            .await
            .map_err(browser_error)?
            .into_value()
            .map_err(browser_error)?;

        if !scan.found {
            return Err(EngineError::ElementNotFound(selector.to_string()));
        }

        Ok(Dropdown {
            selector: selector.to_string(),
            options: scan.options,
        })
    }

    async fn select_by_visible_text(
        &mut self,
        dropdown: &Dropdown,
        text: &str,
    ) -> Result<(), EngineError> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({selector});
                if (!el || !el.options) return false;
                const idx = Array.from(el.options).findIndex(o => o.text.trim() === {text});
                if (idx < 0) return false;
                el.selectedIndex = idx;
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            selector = js_literal(&dropdown.selector),
            text = js_literal(text.trim())
        );

        let selected: bool = self
            .page
            .evaluate(script.as_str())
            .await
            .map_err(browser_error)?
            .into_value()
            .map_err(browser_error)?;

        if selected {
            Ok(())
        } else {
            Err(EngineError::ElementNotFound(format!(
                "option '{}' in {}",
                text, dropdown.selector
            )))
        }
    }

    async fn current_page_source(&mut self) -> Result<String, EngineError> {
        self.page.content().await.map_err(browser_error)
    }

    async fn terminate(&mut self) -> Result<(), EngineError> {
        let result = if self.owns_browser {
            match self.browser.close().await {
                Ok(_) => self.browser.wait().await.map(|_| ()).map_err(browser_error),
                Err(e) => Err(browser_error(e)),
            }
        } else {
            self.page.clone().close().await.map_err(browser_error)
        };

        self.handler_task.abort();
        result
    }
}
