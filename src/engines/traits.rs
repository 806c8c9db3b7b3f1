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

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非成功状态码
    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(u16),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 元素不存在
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    /// 浏览器自动化失败
    #[error("Browser error: {0}")]
    Browser(String),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 判断错误是否可重试
    ///
    /// # 返回值
    ///
    /// 如果错误是可重试的则返回true，否则返回false
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::RequestFailed(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            EngineError::UnexpectedStatus(status) => *status >= 500,
            EngineError::Timeout | EngineError::Browser(_) => true,
            EngineError::ElementNotFound(_) | EngineError::Other(_) => false,
        }
    }
}

/// 下拉框选项
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DropdownOption {
    /// 可见文本（未去除空白）
    pub text: String,
    /// 是否已选中；自动化层无法读取选中属性时为 `None`
    pub selected: Option<bool>,
}

impl DropdownOption {
    pub fn new(text: impl Into<String>, selected: Option<bool>) -> Self {
        Self {
            text: text.into(),
            selected,
        }
    }

    /// 去除首尾空白后的标签
    pub fn label(&self) -> &str {
        self.text.trim()
    }
}

/// 下拉框
///
/// 一次扫描得到的选项快照，按显示顺序排列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropdown {
    /// 定位下拉框使用的选择器
    pub selector: String,
    /// 选项列表
    pub options: Vec<DropdownOption>,
}

impl Dropdown {
    /// 所有选项的标签
    pub fn labels(&self) -> Vec<String> {
        self.options.iter().map(|o| o.label().to_string()).collect()
    }
}

/// 浏览器会话特质
///
/// 有状态的网页客户端。会话不要求线程安全，一个会话同一时间只服务一个抓取序列。
#[async_trait]
pub trait BrowserSession: Send {
    /// 导航到指定URL
    async fn load(&mut self, url: &str) -> Result<(), EngineError>;

    /// 等待元素出现，超时返回 `EngineError::Timeout`
    async fn wait_for_element(&mut self, selector: &str, timeout: Duration)
        -> Result<(), EngineError>;

    /// 定位下拉框并读取其选项
    async fn find_dropdown(&mut self, selector: &str) -> Result<Dropdown, EngineError>;

    /// 按可见文本选择选项
    async fn select_by_visible_text(
        &mut self,
        dropdown: &Dropdown,
        text: &str,
    ) -> Result<(), EngineError>;

    /// 当前页面源码
    async fn current_page_source(&mut self) -> Result<String, EngineError>;

    /// 终止会话并释放浏览器资源
    async fn terminate(&mut self) -> Result<(), EngineError>;
}

/// 浏览器会话工厂特质
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// 创建新的浏览器会话
    async fn create(&self) -> Result<Box<dyn BrowserSession>, EngineError>;
}

/// 轻量页面抓取特质
///
/// 不经过浏览器，直接以HTTP GET获取页面
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 获取页面内容
    async fn fetch(&self, url: &str) -> Result<String, EngineError>;

    /// 抓取器名称
    fn name(&self) -> &'static str;
}
