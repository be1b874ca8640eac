// 该文件是 Qifang （漆坊） 项目的一部分。
// src/visualize.rs - 可视化配置
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

pub mod aggregate;
pub mod draw;
pub mod palette;
pub mod summary;

pub use self::aggregate::{BoxEntries, DisplayEntry, aggregate_detections};
pub use self::draw::{Draw, RenderOutcome};
pub use self::palette::Palette;
pub use self::summary::{LabelCounts, summarize_entries};

/// 全量计数模式的置信度阈值（沿用历史取值，与目标模式不同）
pub const SINGLE_IMAGE_MIN_SCORE: f32 = 0.8;
/// 目标子集模式的置信度阈值（沿用历史取值，与全量模式不同）
pub const TARGET_MIN_SCORE: f32 = 0.85;

/// 默认最多绘制的框数
pub const DEFAULT_MAX_BOXES: usize = 20;
/// 默认边框线宽（像素）
pub const DEFAULT_LINE_THICKNESS: u32 = 4;

/// 框的放行策略：决定哪些框会被绘制并计入清单
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MatchPolicy {
  /// 所有框全部放行
  #[default]
  All,
  /// 首条显示串包含给定子串时放行（单目标计数场景）
  Substring(String),
  /// 首条显示串冒号之前的前缀属于给定集合时放行（多目标剔除清单场景）
  PrefixSet(Vec<String>),
}

impl MatchPolicy {
  /// 判断一组叠放标签是否放行。`labels` 为该框的显示串列表，
  /// 判定只看第一条。空列表不放行。
  pub fn admits(&self, labels: &[String]) -> bool {
    let Some(first) = labels.first() else {
      return false;
    };
    match self {
      MatchPolicy::All => true,
      MatchPolicy::Substring(needle) => first.contains(needle.as_str()),
      MatchPolicy::PrefixSet(set) => {
        let prefix = first.split(':').next().unwrap_or(first);
        set.iter().any(|s| s == prefix)
      }
    }
  }
}

/// 单次调用的可视化配置
///
/// 所有过滤参数都通过该结构按调用传递，调用之间不共享任何可变状态。
#[derive(Debug, Clone)]
pub struct VisualizeOptions {
  /// 置信度下限，严格大于该值的检测才会被采纳
  pub min_score_thresh: f32,
  /// 最多处理的框数，`None` 表示不限
  pub max_boxes: Option<usize>,
  /// 类别无关模式：只报告置信度，不解析类别
  pub agnostic: bool,
  /// 边界框坐标是否为归一化坐标
  pub normalized_coordinates: bool,
  /// 边框线宽（像素）
  pub line_thickness: u32,
  /// 框的放行策略
  pub match_policy: MatchPolicy,
}

impl Default for VisualizeOptions {
  fn default() -> Self {
    VisualizeOptions {
      min_score_thresh: SINGLE_IMAGE_MIN_SCORE,
      max_boxes: Some(DEFAULT_MAX_BOXES),
      agnostic: false,
      normalized_coordinates: true,
      line_thickness: DEFAULT_LINE_THICKNESS,
      match_policy: MatchPolicy::All,
    }
  }
}

impl VisualizeOptions {
  pub fn with_threshold(mut self, min_score_thresh: f32) -> Self {
    self.min_score_thresh = min_score_thresh;
    self
  }

  pub fn with_max_boxes(mut self, max_boxes: Option<usize>) -> Self {
    self.max_boxes = max_boxes;
    self
  }

  pub fn with_match_policy(mut self, match_policy: MatchPolicy) -> Self {
    self.match_policy = match_policy;
    self
  }

  pub fn with_line_thickness(mut self, line_thickness: u32) -> Self {
    self.line_thickness = line_thickness;
    self
  }

  pub fn agnostic(mut self, agnostic: bool) -> Self {
    self.agnostic = agnostic;
    self
  }

  pub fn absolute_coordinates(mut self) -> Self {
    self.normalized_coordinates = false;
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn substring_policy_checks_first_label_only() {
    let policy = MatchPolicy::Substring("Red".to_string());
    assert!(policy.admits(&["Red: 95%".to_string()]));
    assert!(!policy.admits(&["Blue: 95%".to_string(), "Red: 90%".to_string()]));
    assert!(!policy.admits(&[]));
  }

  #[test]
  fn prefix_set_policy_is_membership_not_containment() {
    let policy = MatchPolicy::PrefixSet(vec!["Red".to_string(), "Green".to_string()]);
    assert!(policy.admits(&["Red: 95%".to_string()]));
    assert!(!policy.admits(&["Blue: 95%".to_string()]));
    // 前缀必须整体匹配集合成员，"Reddish" 不应放行
    assert!(!policy.admits(&["Reddish: 95%".to_string()]));
  }

  #[test]
  fn all_policy_admits_everything_with_labels() {
    assert!(MatchPolicy::All.admits(&["score: 88%".to_string()]));
    assert!(!MatchPolicy::All.admits(&[]));
  }
}
