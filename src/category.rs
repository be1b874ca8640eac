// 该文件是 Qifang （漆坊） 项目的一部分。
// src/category.rs - 类别索引
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// 未知类别的替代标签
pub const UNKNOWN_LABEL: &str = "N/A";

#[derive(Error, Debug)]
pub enum CategoryIndexError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("标签文件解析错误: {0}")]
  ParseError(#[from] serde_json::Error),
}

/// 一个类别条目，标签文件中的一条记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
  /// 类别编号（从 1 开始，与检测结果中的编号一致）
  pub id: u32,
  /// 显示名称
  pub name: String,
}

/// 类别编号到显示名称的索引
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
  categories: BTreeMap<u32, Category>,
}

impl CategoryIndex {
  /// 从 JSON 标签文件加载索引，文件内容为 `Category` 数组
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CategoryIndexError> {
    let text = std::fs::read_to_string(path)?;
    Self::from_json(&text)
  }

  pub fn from_json(text: &str) -> Result<Self, CategoryIndexError> {
    let categories: Vec<Category> = serde_json::from_str(text)?;
    Ok(Self::from_categories(categories))
  }

  pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
    let mut index = BTreeMap::new();
    for category in categories {
      if let Some(old) = index.insert(category.id, category) {
        warn!("标签编号 {} 重复，保留后出现的条目", old.id);
      }
    }
    CategoryIndex { categories: index }
  }

  /// 查询显示名称
  pub fn name(&self, id: u32) -> Option<&str> {
    self.categories.get(&id).map(|c| c.name.as_str())
  }

  /// 查询显示名称，未知编号退化为 `"N/A"` 而不是报错
  pub fn name_or_unknown(&self, id: u32) -> &str {
    self.name(id).unwrap_or(UNKNOWN_LABEL)
  }

  pub fn len(&self) -> usize {
    self.categories.len()
  }

  pub fn is_empty(&self) -> bool {
    self.categories.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_index() -> CategoryIndex {
    CategoryIndex::from_categories([
      Category {
        id: 1,
        name: "Red".to_string(),
      },
      Category {
        id: 2,
        name: "Blue".to_string(),
      },
    ])
  }

  #[test]
  fn lookup_known_id() {
    let index = sample_index();
    assert_eq!(index.name(1), Some("Red"));
    assert_eq!(index.name_or_unknown(2), "Blue");
  }

  #[test]
  fn unknown_id_falls_back_to_na() {
    let index = sample_index();
    assert_eq!(index.name(9), None);
    assert_eq!(index.name_or_unknown(9), "N/A");
  }

  #[test]
  fn parse_json_label_file() {
    let index = CategoryIndex::from_json(
      r#"[{"id": 1, "name": "Red"}, {"id": 2, "name": "Blue"}, {"id": 3, "name": "Green"}]"#,
    )
    .unwrap();
    assert_eq!(index.len(), 3);
    assert_eq!(index.name_or_unknown(3), "Green");
  }

  #[test]
  fn invalid_json_is_an_error() {
    assert!(CategoryIndex::from_json("not json").is_err());
  }
}
