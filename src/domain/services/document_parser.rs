// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::member::CongressMember;
use crate::utils::errors::ParseError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::InvalidSelector(format!("{}: {}", css, e)))
}

/// 合并元素内的空白
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolve_profile_url(base: Option<&Url>, base_url: &str, href: &str) -> String {
    match base.and_then(|b| b.join(href).ok()) {
        Some(resolved) => resolved.to_string(),
        None => format!("{}{}", base_url, href),
    }
}

/// 解析议员表格
///
/// 取页面中第一个 `table`，跳过表头行；每行至少三个 `td`：
/// 第二列为姓名链接（无链接的行被跳过），第三列为议会党团，
/// 第四列中的链接文本为电子邮件（缺失时为空）。
///
/// # 参数
///
/// * `html` - 页面HTML
/// * `base_url` - 用于解析个人主页相对链接的基础URL
///
/// # 返回值
///
/// * `Ok(Vec<CongressMember>)` - 按表格顺序排列的议员
/// * `Err(ParseError::TableNotFound)` - 页面中没有表格
pub fn parse_members(html: &str, base_url: &str) -> Result<Vec<CongressMember>, ParseError> {
    let document = Html::parse_document(html);
    let table_selector = selector("table")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;
    let link_selector = selector("a")?;
    let base = Url::parse(base_url).ok();

    let table = document
        .select(&table_selector)
        .next()
        .ok_or(ParseError::TableNotFound)?;

    let mut members = Vec::new();
    for row in table.select(&row_selector).skip(1) {
        let cells: Vec<ElementRef<'_>> = row.select(&cell_selector).collect();
        if cells.len() < 3 {
            continue;
        }

        let Some(name_link) = cells[1].select(&link_selector).next() else {
            continue;
        };

        let href = name_link.value().attr("href").unwrap_or_default();
        let email = cells
            .get(3)
            .and_then(|cell| cell.select(&link_selector).next())
            .map(text_of)
            .unwrap_or_default();

        members.push(CongressMember {
            name: text_of(name_link),
            parliamentary_group: text_of(cells[2]),
            email,
            profile_url: resolve_profile_url(base.as_ref(), base_url, href),
        });
    }

    Ok(members)
}

/// 解析立法期下拉框的选项
///
/// 返回去除首尾空白后的选项文本，跳过空选项和 "Todos"（不区分大小写）
pub fn parse_period_options(html: &str, select_css: &str) -> Result<Vec<String>, ParseError> {
    let document = Html::parse_document(html);
    let select_selector = selector(select_css)?;
    let option_selector = selector("option")?;

    let select = document
        .select(&select_selector)
        .next()
        .ok_or_else(|| ParseError::PeriodSelectNotFound(select_css.to_string()))?;

    Ok(select
        .select(&option_selector)
        .map(text_of)
        .filter(|label| !label.is_empty() && !label.eq_ignore_ascii_case("todos"))
        .collect())
}
