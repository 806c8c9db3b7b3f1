// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含批量抓取和当前页面等用例
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含立法期模型、页面存储接口和页面缓存服务
pub mod domain;

/// 引擎模块
///
/// 浏览器会话与HTTP抓取实现
pub mod engines;

/// 基础设施模块
///
/// 数据库、导出和指标
pub mod infrastructure;

/// 工具模块
///
/// 错误类型和日志
pub mod utils;
