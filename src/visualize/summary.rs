// 该文件是 Qifang （漆坊） 项目的一部分。
// src/visualize/summary.rs - 计数清单归约
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use serde::Serialize;

use crate::visualize::aggregate::BoxEntries;
use crate::visualize::MatchPolicy;

/// 标签出现次数表，保持首次出现顺序
///
/// 该结构是聚合结果与下游目标筛选之间的正式数据通道：
/// 需要按标签取数的代码直接消费它，而不是把清单字符串再解析回来。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelCounts {
  counts: Vec<(String, usize)>,
}

impl LabelCounts {
  /// 按首次出现顺序遍历 (标签, 次数)
  pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
    self.counts.iter().map(|(t, c)| (t.as_str(), *c))
  }

  pub fn get(&self, token: &str) -> Option<usize> {
    self
      .counts
      .iter()
      .find(|(t, _)| t == token)
      .map(|(_, c)| *c)
  }

  pub fn len(&self) -> usize {
    self.counts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.counts.is_empty()
  }

  /// 清单字符串：`"token: count, token: count"`，无花括号包裹
  pub fn to_summary_string(&self) -> String {
    self
      .counts
      .iter()
      .map(|(t, c)| format!("{}: {}", t, c))
      .collect::<Vec<_>>()
      .join(", ")
  }
}

impl std::fmt::Display for LabelCounts {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.to_summary_string())
  }
}

/// 把幸存框的显示串列表归约为计数清单
///
/// 列表按传入顺序拼接，随后剥离列表字面量痕迹（`['`、`']`）、
/// 百分号与冒号，再剔除全部数字（嵌入的置信度百分比），
/// 剩余记号按空白切分做词频统计。输入为空得到空清单而不是错误。
pub fn summarize<'a>(survivors: impl IntoIterator<Item = &'a Vec<String>>) -> LabelCounts {
  let mut concatenated = String::new();
  for labels in survivors {
    concatenated.push_str(&render_label_list(labels));
  }
  word_count(&strip_noise(&concatenated))
}

/// 对聚合条目做放行过滤后归约，条目顺序即首次出现顺序
pub fn summarize_entries(entries: &BoxEntries, policy: &MatchPolicy) -> LabelCounts {
  let survivors: Vec<&Vec<String>> = entries
    .iter()
    .filter(|(_, entry)| policy.admits(&entry.labels))
    .map(|(_, entry)| &entry.labels)
    .collect();
  summarize(survivors)
}

/// 显示串列表的字面量形式，如 `['Red: 95%', 'Blue: 85%']`
fn render_label_list(labels: &[String]) -> String {
  let mut out = String::from("['");
  out.push_str(&labels.join("', '"));
  out.push_str("']");
  out
}

/// 剥离列表痕迹、百分号、冒号与数字
fn strip_noise(text: &str) -> String {
  text
    .replace("['", " ")
    .replace("']", " ")
    .replace('%', "")
    .replace(':', "")
    .chars()
    .filter(|c| !c.is_ascii_digit())
    .collect()
}

/// 空白切分的词频统计，保持首次出现顺序
fn word_count(text: &str) -> LabelCounts {
  let mut counts: Vec<(String, usize)> = Vec::new();
  for token in text.split_whitespace() {
    match counts.iter_mut().find(|(t, _)| t == token) {
      Some((_, c)) => *c += 1,
      None => counts.push((token.to_string(), 1)),
    }
  }
  LabelCounts { counts }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::category::{Category, CategoryIndex};
  use crate::detection::Detection;
  use crate::visualize::aggregate::aggregate_detections;
  use crate::visualize::palette::Palette;
  use crate::visualize::VisualizeOptions;

  fn labels(strings: &[&str]) -> Vec<String> {
    strings.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn round_trip_two_distinct_labels() {
    let a = labels(&["Red: 80%"]);
    let b = labels(&["Blue: 92%"]);
    let counts = summarize([&a, &b]);
    assert_eq!(counts.to_summary_string(), "Red: 1, Blue: 1");
  }

  #[test]
  fn repeated_labels_are_counted() {
    let a = labels(&["Red: 80%"]);
    let b = labels(&["Red: 95%"]);
    let c = labels(&["Blue: 92%"]);
    let counts = summarize([&a, &b, &c]);
    assert_eq!(counts.to_summary_string(), "Red: 2, Blue: 1");
    assert_eq!(counts.get("Red"), Some(2));
  }

  #[test]
  fn empty_input_yields_empty_but_valid_string() {
    let counts = summarize(Vec::<&Vec<String>>::new());
    assert!(counts.is_empty());
    assert_eq!(counts.to_summary_string(), "");
  }

  #[test]
  fn output_is_free_of_digits_and_stripped_punctuation() {
    let a = labels(&["Red: 80%"]);
    let counts = summarize([&a]);
    let summary = counts.to_summary_string();
    // 计数本身是数字，标签部分不含数字与百分号
    for (token, _) in counts.iter() {
      assert!(!token.contains('%'));
      assert!(!token.contains(':'));
      assert!(!token.chars().any(|c| c.is_ascii_digit()));
    }
    assert!(!summary.contains('{') && !summary.contains('}'));
  }

  #[test]
  fn repeated_reduction_is_byte_identical() {
    let a = labels(&["Red: 80%"]);
    let b = labels(&["Blue: 92%"]);
    let first = summarize([&a, &b]).to_summary_string();
    let second = summarize([&a, &b]).to_summary_string();
    assert_eq!(first, second);
  }

  #[test]
  fn entries_are_reduced_in_first_seen_order() {
    let index = CategoryIndex::from_categories([
      Category {
        id: 1,
        name: "Red".to_string(),
      },
      Category {
        id: 2,
        name: "Blue".to_string(),
      },
    ]);
    let options = VisualizeOptions::default().with_threshold(0.5);
    let entries = aggregate_detections(
      vec![
        Detection::new([0.5, 0.5, 0.6, 0.6], 2, 0.9),
        Detection::new([0.0, 0.0, 0.1, 0.1], 1, 0.9),
        Detection::new([0.2, 0.2, 0.3, 0.3], 2, 0.9),
      ],
      &index,
      &options,
      &Palette::default(),
    );
    let counts = summarize_entries(&entries, &MatchPolicy::All);
    assert_eq!(counts.to_summary_string(), "Blue: 2, Red: 1");
  }

  #[test]
  fn prefix_set_filters_before_reduction() {
    let index = CategoryIndex::from_categories([
      Category {
        id: 1,
        name: "Red".to_string(),
      },
      Category {
        id: 2,
        name: "Blue".to_string(),
      },
    ]);
    let options = VisualizeOptions::default().with_threshold(0.5);
    let entries = aggregate_detections(
      vec![
        Detection::new([0.0, 0.0, 0.1, 0.1], 1, 0.9),
        Detection::new([0.2, 0.2, 0.3, 0.3], 2, 0.91),
      ],
      &index,
      &options,
      &Palette::default(),
    );
    let policy = MatchPolicy::PrefixSet(vec!["Red".to_string(), "Green".to_string()]);
    let counts = summarize_entries(&entries, &policy);
    assert_eq!(counts.to_summary_string(), "Red: 1");
  }

  #[test]
  fn label_counts_serialize_to_json() {
    let a = labels(&["Red: 80%"]);
    let counts = summarize([&a]);
    let json = serde_json::to_string(&counts).unwrap();
    assert!(json.contains("Red"));
  }
}
