// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::period::PeriodIdentifier;
use crate::domain::models::session::SessionState;
use crate::engines::traits::{BrowserSession, Dropdown, EngineError, SessionFactory};
use std::time::Duration;
use tracing::{debug, warn};

/// 重新加载等待时间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadTiming {
    /// 选择之后、开始等待表格之前的固定等待
    pub settle_delay: Duration,
    /// 表格出现之后的额外缓冲
    pub post_reload_delay: Duration,
    /// 等待表格出现的超时
    pub ready_timeout: Duration,
}

/// 作用域浏览器会话
///
/// 包装一个 [`BrowserSession`]，跟踪 [`SessionState`] 并保证释放：
/// 正常路径调用 [`ScopedSession::release`]；未释放即被丢弃时，
/// 在当前 tokio 运行时上后台终止会话。
pub struct ScopedSession {
    inner: Option<Box<dyn BrowserSession>>,
    state: SessionState,
}

impl ScopedSession {
    /// 从工厂获取新会话
    pub async fn acquire(factory: &dyn SessionFactory) -> Result<Self, EngineError> {
        let inner = factory.create().await?;
        debug!("Browser session acquired");
        Ok(Self::new(inner))
    }

    pub fn new(inner: Box<dyn BrowserSession>) -> Self {
        Self {
            inner: Some(inner),
            state: SessionState::Uninitialized,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    fn session(&mut self) -> Result<&mut Box<dyn BrowserSession>, EngineError> {
        self.inner
            .as_mut()
            .ok_or_else(|| EngineError::Other("browser session already terminated".to_string()))
    }

    /// 确保基础页面已加载
    ///
    /// 仅在 `Uninitialized` 状态下导航并等待就绪元素；失败时状态保持不变
    pub async fn ensure_loaded(
        &mut self,
        url: &str,
        ready_selector: &str,
        timeout: Duration,
    ) -> Result<(), EngineError> {
        if self.state.is_loaded() {
            return Ok(());
        }

        let session = self.session()?;
        session.load(url).await?;
        session.wait_for_element(ready_selector, timeout).await?;

        self.state = SessionState::Loaded;
        debug!(url, "Base page loaded");
        Ok(())
    }

    pub async fn find_dropdown(&mut self, selector: &str) -> Result<Dropdown, EngineError> {
        self.session()?.find_dropdown(selector).await
    }

    /// 选择立法期并等待页面重新加载
    pub async fn select_period(
        &mut self,
        dropdown: &Dropdown,
        period: &PeriodIdentifier,
        ready_selector: &str,
        timing: ReloadTiming,
    ) -> Result<(), EngineError> {
        let session = self.session()?;
        session
            .select_by_visible_text(dropdown, period.as_str())
            .await?;

        // Mid-reload: nothing about the page can be trusted until the table is back
        self.state = SessionState::Uninitialized;

        tokio::time::sleep(timing.settle_delay).await;
        self.session()?
            .wait_for_element(ready_selector, timing.ready_timeout)
            .await?;
        tokio::time::sleep(timing.post_reload_delay).await;

        self.state = SessionState::PeriodSelected(period.clone());
        Ok(())
    }

    /// 记录该立法期已处于选中状态（无需重新加载）
    pub fn mark_selected(&mut self, period: &PeriodIdentifier) {
        self.state = SessionState::PeriodSelected(period.clone());
    }

    pub async fn page_source(&mut self) -> Result<String, EngineError> {
        self.session()?.current_page_source().await
    }

    /// 终止并释放会话
    pub async fn release(mut self) {
        if let Some(mut session) = self.inner.take() {
            if let Err(e) = session.terminate().await {
                warn!("Failed to terminate browser session: {}", e);
            } else {
                debug!("Browser session terminated");
            }
        }
        self.state = SessionState::Terminated;
    }
}

impl Drop for ScopedSession {
    fn drop(&mut self) {
        let Some(mut session) = self.inner.take() else {
            return;
        };

        warn!("Browser session dropped without release, terminating in background");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = session.terminate().await {
                        warn!("Background termination of browser session failed: {}", e);
                    }
                });
            }
            Err(_) => warn!("No tokio runtime available, browser session could not be terminated"),
        }
    }
}
