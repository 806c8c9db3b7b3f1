// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供页面存储接口的数据库实现和内存实现
pub mod memory_page_store;
pub mod page_store_impl;
