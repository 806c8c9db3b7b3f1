// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 立法期页面缓存（period_fetch_cache）：按立法期提供新鲜页面，未命中时驱动浏览器抓取
/// - 当前页面缓存（current_page_cache）：不经浏览器获取并缓存默认页面
/// - 文档解析（document_parser）：从页面HTML中解析议员和立法期
pub mod current_page_cache;
pub mod document_parser;
pub mod period_fetch_cache;
