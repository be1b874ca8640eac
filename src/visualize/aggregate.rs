// 该文件是 Qifang （漆坊） 项目的一部分。
// src/visualize/aggregate.rs - 检测结果聚合
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::Rgb;

use crate::category::CategoryIndex;
use crate::detection::{BoxKey, Detection};
use crate::visualize::palette::{AGNOSTIC_COLOR, Palette};
use crate::visualize::VisualizeOptions;

/// 一个框位置上的显示内容：叠放的标签串与分配到的颜色
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayEntry {
  /// 显示串列表，按检测到达顺序叠放
  pub labels: Vec<String>,
  /// 框与标签底色
  pub color: Rgb<u8>,
}

/// 按框位置分组后的条目序列
///
/// 条目保持首次出现顺序，使清单输出顺序成为稳定契约，
/// 而不是依赖哈希表的遍历顺序。
#[derive(Debug, Clone, Default)]
pub struct BoxEntries {
  entries: Vec<(BoxKey, DisplayEntry)>,
}

impl BoxEntries {
  /// 取某个键的条目，没有则按给定颜色新建
  fn entry_mut(&mut self, key: BoxKey, color: Rgb<u8>) -> &mut DisplayEntry {
    if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
      return &mut self.entries[pos].1;
    }
    self.entries.push((
      key,
      DisplayEntry {
        labels: Vec::new(),
        color,
      },
    ));
    let last = self.entries.len() - 1;
    &mut self.entries[last].1
  }

  /// 按首次出现顺序遍历
  pub fn iter(&self) -> impl Iterator<Item = (&BoxKey, &DisplayEntry)> {
    self.entries.iter().map(|(k, v)| (k, v))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// 将原始检测聚合为按框位置分组的显示条目
///
/// - 按输入顺序最多处理 `options.max_boxes` 条检测；
/// - 严格大于 `options.min_score_thresh` 的检测才被采纳（边界不含）；
/// - 未知类别编号退化为 `"N/A"` 标签，从不报错；
/// - 类别无关模式下显示 `"score: {}%"` 并统一使用固定颜色；
/// - 坐标完全相同的检测叠放到同一条目，颜色以后到者为准。
pub fn aggregate_detections(
  detections: impl IntoIterator<Item = Detection>,
  index: &CategoryIndex,
  options: &VisualizeOptions,
  palette: &Palette,
) -> BoxEntries {
  let mut entries = BoxEntries::default();
  let max_boxes = options.max_boxes.unwrap_or(usize::MAX);

  for detection in detections.into_iter().take(max_boxes) {
    if detection.score <= options.min_score_thresh {
      continue;
    }

    let (display_str, color) = if options.agnostic {
      (
        format!("score: {}%", percent(detection.score)),
        AGNOSTIC_COLOR,
      )
    } else {
      (
        format!(
          "{}: {}%",
          index.name_or_unknown(detection.class_id),
          percent(detection.score)
        ),
        palette.color_for_class(detection.class_id),
      )
    };

    let key = BoxKey::from(detection.bbox);
    let entry = entries.entry_mut(key, color);
    entry.labels.push(display_str);
    entry.color = color;
  }

  entries
}

/// 置信度换算为最接近的整数百分比
fn percent(score: f32) -> i32 {
  (100.0 * score).round() as i32
}
