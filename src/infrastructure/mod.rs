// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，负责与外部系统的交互。
///
/// 包含的子模块：
/// - 数据库（database）：数据库连接、迁移和实体映射
/// - 导出（export）：将解析结果写为JSON和CSV文件
/// - 指标（metrics）：Prometheus指标导出
/// - 仓库实现（repositories）：页面存储接口的具体实现
pub mod database;
pub mod export;
pub mod metrics;
pub mod repositories;
