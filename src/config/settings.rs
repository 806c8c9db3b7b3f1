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

use crate::domain::models::page_record::FreshnessPolicy;
use crate::domain::services::period_fetch_cache::FetchOptions;
use crate::engines::session::ReloadTiming;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 国会议员列表页面
pub const DEFAULT_BASE_URL: &str = "https://www.congreso.gob.pe/pleno/congresistas/";

/// 立法期下拉框所在的表单控件
pub const DEFAULT_PERIOD_SELECTOR: &str = "select[name='idRegistroPadre'], #idRegistroPadre";

/// 新鲜度窗口上限（十年）
pub const MAX_FRESHNESS_WINDOW_HOURS: i64 = 24 * 365 * 10;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// 应用程序配置设置
///
/// 包含数据库、抓取、浏览器、输出和指标等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 抓取配置
    pub scraper: ScraperSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 输出配置
    pub output: OutputSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 数据库配置设置
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 抓取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperSettings {
    /// 议员列表页面URL
    pub base_url: String,
    /// 立法期下拉框选择器
    pub period_selector: String,
    /// 页面就绪信号（成员表格）选择器
    pub ready_selector: String,
    /// 请求使用的User-Agent
    pub user_agent: String,
    /// 等待页面就绪的超时（秒）
    pub page_load_timeout_secs: u64,
    /// 选择立法期后的固定等待（毫秒）
    pub settle_delay_ms: u64,
    /// 表格重新出现后的额外缓冲（毫秒）
    pub post_reload_delay_ms: u64,
    /// 缓存新鲜度窗口（小时）
    pub freshness_window_hours: i64,
    /// HTTP请求超时（秒）
    pub http_timeout_secs: u64,
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 是否无头模式
    pub headless: bool,
    /// 远程调试地址，设置后连接已有的Chrome实例
    pub remote_debugging_url: Option<String>,
    /// 窗口宽度
    pub window_width: u32,
    /// 窗口高度
    pub window_height: u32,
    /// CDP请求超时（秒）
    pub request_timeout_secs: u64,
}

/// 输出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    /// 输出目录
    pub directory: String,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用Prometheus导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_address: String,
}

impl ScraperSettings {
    /// 转换为缓存协调器使用的选项
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            base_url: self.base_url.clone(),
            period_selector: self.period_selector.clone(),
            ready_selector: self.ready_selector.clone(),
            page_load_timeout: Duration::from_secs(self.page_load_timeout_secs),
            reload: ReloadTiming {
                settle_delay: Duration::from_millis(self.settle_delay_ms),
                post_reload_delay: Duration::from_millis(self.post_reload_delay_ms),
                ready_timeout: Duration::from_secs(self.page_load_timeout_secs),
            },
            freshness: self.freshness(),
        }
    }

    /// 新鲜度策略，窗口无法表示时退回默认值（`Settings` 加载时已校验）
    pub fn freshness(&self) -> FreshnessPolicy {
        chrono::Duration::try_hours(self.freshness_window_hours)
            .map(FreshnessPolicy::new)
            .unwrap_or_default()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_FRESHNESS_WINDOW_HOURS).contains(&self.freshness_window_hours) {
            return Err(ConfigError::Message(format!(
                "scraper.freshness_window_hours must be between 1 and {}, got {}",
                MAX_FRESHNESS_WINDOW_HOURS, self.freshness_window_hours
            )));
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和 `CONGRESO__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败或取值超出范围
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("CONGRESO").separator("__"));

        Self::load(builder)
    }

    fn load(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let settings: Self = builder.build()?.try_deserialize()?;
        settings.scraper.validate()?;
        Ok(settings)
    }

    fn defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            // Default DB settings
            .set_default("database.url", "sqlite://congreso.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default scraper settings
            .set_default("scraper.base_url", DEFAULT_BASE_URL)?
            .set_default("scraper.period_selector", DEFAULT_PERIOD_SELECTOR)?
            .set_default("scraper.ready_selector", "table")?
            .set_default("scraper.user_agent", DEFAULT_USER_AGENT)?
            .set_default("scraper.page_load_timeout_secs", 15)?
            .set_default("scraper.settle_delay_ms", 3000)?
            .set_default("scraper.post_reload_delay_ms", 1000)?
            .set_default("scraper.freshness_window_hours", 24)?
            .set_default("scraper.http_timeout_secs", 30)?
            // Default browser settings
            .set_default("browser.headless", true)?
            .set_default("browser.window_width", 1920)?
            .set_default("browser.window_height", 1080)?
            .set_default("browser.request_timeout_secs", 30)?
            // Default output and metrics settings
            .set_default("output.directory", "output")?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_address", "0.0.0.0:9000")
    }

    /// 仅使用内置默认值构建配置
    pub fn from_defaults() -> Result<Self, ConfigError> {
        Self::load(Self::defaults(Config::builder())?)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
