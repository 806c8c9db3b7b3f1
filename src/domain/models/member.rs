// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 国会议员
///
/// 从成员表格中解析出的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CongressMember {
    /// 姓名
    pub name: String,
    /// 议会党团
    pub parliamentary_group: String,
    /// 电子邮件，缺失时为空字符串
    pub email: String,
    /// 个人主页链接
    pub profile_url: String,
}
