// 该文件是 Qifang （漆坊） 项目的一部分。
// src/detection.rs - 检测结果数据
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use serde::{Deserialize, Serialize};

/// 单条检测结果
///
/// 边界框为 `[ymin, xmin, ymax, xmax]`，归一化坐标（0 到 1）或像素坐标，
/// 由渲染时的坐标模式决定。类别编号从 1 开始，与标签索引一致。
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
  pub bbox: [f32; 4],
  pub class_id: u32,
  pub score: f32,
}

impl Detection {
  pub fn new(bbox: [f32; 4], class_id: u32, score: f32) -> Self {
    Detection {
      bbox,
      class_id,
      score,
    }
  }
}

/// 模型输出的平行数组形式：boxes / classes / scores 下标一一对应
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionArrays {
  pub boxes: Vec<[f32; 4]>,
  pub classes: Vec<u32>,
  pub scores: Vec<f32>,
}

impl DetectionArrays {
  /// 按下标合并为 `Detection` 序列。长度不一致时以最短数组为准，
  /// 多余的条目丢弃而不报错。
  pub fn iter(&self) -> impl Iterator<Item = Detection> + '_ {
    self
      .boxes
      .iter()
      .zip(self.classes.iter())
      .zip(self.scores.iter())
      .map(|((bbox, class_id), score)| Detection::new(*bbox, *class_id, *score))
  }

  pub fn len(&self) -> usize {
    self.boxes.len().min(self.classes.len()).min(self.scores.len())
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// 边界框坐标组成的分组键
///
/// 坐标完全相同的检测会合并到同一个视觉实体（同框多标签叠放）。
/// 浮点数按位比较，以便用作键值；这里不做数值归一（-0.0 与 0.0 视为不同，
/// NaN 与自身相等），因为键只用于"同一个框"的精确分组。
#[derive(Debug, Clone, Copy)]
pub struct BoxKey(pub [f32; 4]);

impl BoxKey {
  fn bits(&self) -> [u32; 4] {
    [
      self.0[0].to_bits(),
      self.0[1].to_bits(),
      self.0[2].to_bits(),
      self.0[3].to_bits(),
    ]
  }

  pub fn ymin(&self) -> f32 {
    self.0[0]
  }

  pub fn xmin(&self) -> f32 {
    self.0[1]
  }

  pub fn ymax(&self) -> f32 {
    self.0[2]
  }

  pub fn xmax(&self) -> f32 {
    self.0[3]
  }
}

impl PartialEq for BoxKey {
  fn eq(&self, other: &Self) -> bool {
    self.bits() == other.bits()
  }
}

impl Eq for BoxKey {}

impl std::hash::Hash for BoxKey {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    self.bits().hash(state);
  }
}

impl From<[f32; 4]> for BoxKey {
  fn from(bbox: [f32; 4]) -> Self {
    BoxKey(bbox)
  }
}
