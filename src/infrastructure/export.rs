// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::member::CongressMember;
use crate::domain::models::period::PeriodIdentifier;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

const CSV_HEADER: [&str; 4] = ["name", "parliamentary_group", "email", "profile_url"];

/// 将议员列表序列化为CSV文本
///
/// 含逗号、引号或换行的字段会按RFC 4180加引号
pub fn to_csv_string(members: &[CongressMember]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for member in members {
        writer.write_record([
            member.name.as_str(),
            member.parliamentary_group.as_str(),
            member.email.as_str(),
            member.profile_url.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().context("failed to flush CSV writer")?;
    Ok(String::from_utf8(bytes)?)
}

async fn write_file(path: &Path, contents: String) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote export file");
    Ok(())
}

/// 写出格式化的JSON数组
pub async fn write_json(path: &Path, members: &[CongressMember]) -> Result<()> {
    let json = serde_json::to_string_pretty(members)?;
    write_file(path, json).await
}

pub async fn write_csv(path: &Path, members: &[CongressMember]) -> Result<()> {
    write_file(path, to_csv_string(members)?).await
}

/// 将立法期转为文件名片段，例如 "Parlamentario 2021 - 2026" -> "parlamentario-2021-2026"
pub fn period_slug(period: &PeriodIdentifier) -> String {
    let mut slug = String::with_capacity(period.as_str().len());
    for c in period.as_str().chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "period".to_string()
    } else {
        slug
    }
}

/// 同时写出JSON和CSV，返回写出的路径
pub async fn write_members(
    directory: &Path,
    stem: &str,
    members: &[CongressMember],
) -> Result<(PathBuf, PathBuf)> {
    let json_path = directory.join(format!("{}.json", stem));
    let csv_path = directory.join(format!("{}.csv", stem));
    write_json(&json_path, members).await?;
    write_csv(&csv_path, members).await?;
    Ok((json_path, csv_path))
}
