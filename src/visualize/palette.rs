// 该文件是 Qifang （漆坊） 项目的一部分。
// src/visualize/palette.rs - 类别调色板
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::Rgb;

/// 默认调色板大小
pub const DEFAULT_PALETTE_SIZE: usize = 80;

/// 类别无关模式的固定颜色（DarkOrange）
pub const AGNOSTIC_COLOR: Rgb<u8> = Rgb([255, 140, 0]);

/// 类别调色板
///
/// 颜色由类别编号确定性地映射（`class_id % len`），不随调用变化。
#[derive(Debug, Clone)]
pub struct Palette {
  colors: Vec<Rgb<u8>>,
}

impl Default for Palette {
  fn default() -> Self {
    Self::new(DEFAULT_PALETTE_SIZE)
  }
}

impl Palette {
  /// 生成 n 种色相均匀分布的颜色
  pub fn new(n: usize) -> Self {
    let n = n.max(1);
    let colors = (0..n)
      .map(|i| {
        let hue = (i as f32 / n as f32) * 360.0;
        Self::hsv_to_rgb(hue, 0.8, 0.9)
      })
      .collect();
    Palette { colors }
  }

  /// HSV 转 RGB
  fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb<u8> {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
      (c, x, 0.0)
    } else if h < 120.0 {
      (x, c, 0.0)
    } else if h < 180.0 {
      (0.0, c, x)
    } else if h < 240.0 {
      (0.0, x, c)
    } else if h < 300.0 {
      (x, 0.0, c)
    } else {
      (c, 0.0, x)
    };

    Rgb([
      ((r + m) * 255.0) as u8,
      ((g + m) * 255.0) as u8,
      ((b + m) * 255.0) as u8,
    ])
  }

  /// 按类别编号取色
  pub fn color_for_class(&self, class_id: u32) -> Rgb<u8> {
    self.colors[class_id as usize % self.colors.len()]
  }

  pub fn len(&self) -> usize {
    self.colors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.colors.is_empty()
  }
}
