// 该文件是 Qifang （漆坊） 项目的一部分。
// src/counting.rs - 计数流水线入口
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::RgbImage;
use tracing::debug;

use crate::category::CategoryIndex;
use crate::detection::Detection;
use crate::visualize::{
  Draw, LabelCounts, MatchPolicy, Palette, RenderOutcome, SINGLE_IMAGE_MIN_SCORE,
  TARGET_MIN_SCORE, VisualizeOptions, aggregate_detections, summarize_entries,
};

/// 一次计数调用的产出
#[derive(Debug, Clone)]
pub struct CountReport {
  /// 人读清单串，如 `"Red: 2, Blue: 1"`
  pub summary: String,
  /// 结构化的标签计数，供下游筛选直接消费
  pub counts: LabelCounts,
  /// 渲染旁路信息（是否绘制过、绘制了什么）
  pub outcome: RenderOutcome,
}

/// 聚合、渲染并归约一张图的检测结果
///
/// 图像缓冲区由调用方持有，仅在本次调用内被就地修改；
/// 所有过滤参数来自 `options`，调用之间不残留任何状态。
pub fn overlay_and_count(
  image: &mut RgbImage,
  detections: impl IntoIterator<Item = Detection>,
  index: &CategoryIndex,
  options: &VisualizeOptions,
) -> CountReport {
  let palette = Palette::default();
  let entries = aggregate_detections(detections, index, options, &palette);
  debug!("聚合得到 {} 个框位置", entries.len());

  let draw = Draw::default();
  let outcome = draw.draw_entries(image, &entries, options);
  let counts = summarize_entries(&entries, &options.match_policy);
  debug!("清单包含 {} 种标签", counts.len());

  CountReport {
    summary: counts.to_summary_string(),
    counts,
    outcome,
  }
}

/// 全量计数：统计并标注图中全部识别对象
///
/// `target` 给定时退化为单目标场景，只放行首标签包含该子串的框。
pub fn single_image_counting(
  image: &mut RgbImage,
  detections: impl IntoIterator<Item = Detection>,
  index: &CategoryIndex,
  target: Option<&str>,
) -> CountReport {
  let match_policy = match target {
    Some(needle) => MatchPolicy::Substring(needle.to_string()),
    None => MatchPolicy::All,
  };
  let options = VisualizeOptions::default()
    .with_threshold(SINGLE_IMAGE_MIN_SCORE)
    .with_match_policy(match_policy);
  overlay_and_count(image, detections, index, &options)
}

/// 目标子集计数：只标注并统计指定标签集合内的对象
///
/// 用于剔除清单场景：把不该出现的对象标出来。判定按首标签
/// 冒号前缀的集合成员关系，而不是子串包含。
pub fn target_counting(
  image: &mut RgbImage,
  detections: impl IntoIterator<Item = Detection>,
  index: &CategoryIndex,
  targets: &[String],
) -> CountReport {
  let options = VisualizeOptions::default()
    .with_threshold(TARGET_MIN_SCORE)
    .with_match_policy(MatchPolicy::PrefixSet(targets.to_vec()));
  overlay_and_count(image, detections, index, &options)
}
