// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 包含立法期、页面记录、会话状态和议员等核心数据结构
pub mod member;
pub mod page_record;
pub mod period;
pub mod session;
