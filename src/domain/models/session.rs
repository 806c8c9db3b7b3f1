// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::period::PeriodIdentifier;

/// 浏览器会话状态
///
/// `Uninitialized -> Loaded -> PeriodSelected(P) -> Terminated`。
/// 每次选择立法期都会触发页面重新加载。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// 尚未加载基础页面
    Uninitialized,
    /// 基础页面已加载，下拉框可见
    Loaded,
    /// 已选择某个立法期并完成重新加载
    PeriodSelected(PeriodIdentifier),
    /// 会话已终止
    Terminated,
}

impl SessionState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, SessionState::Loaded | SessionState::PeriodSelected(_))
    }
}
