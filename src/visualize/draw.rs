// 该文件是 Qifang （漆坊） 项目的一部分。
// src/visualize/draw.rs - 标注渲染
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::detection::BoxKey;
use crate::visualize::aggregate::{BoxEntries, DisplayEntry};
use crate::visualize::VisualizeOptions;

// 文本渲染常量
const LABEL_FONT_SIZE: f32 = 20.0;
const LABEL_TEXT_HEIGHT: i32 = 24;
const LABEL_CHAR_WIDTH: f32 = 11.0; // 每字符平均宽度（粗略估计）
const LABEL_TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]); // 黑色文本

/// 渲染结果的旁路信息
///
/// `detected` 表示本次调用是否真的绘制了至少一个框，调用方据此决定
/// 保存"干净"还是"标记"版本的图片；`note` 为被绘制框首标签的逗号串。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOutcome {
  pub detected: bool,
  pub note: String,
}

/// 标注渲染器
pub struct Draw<'a> {
  font: FontRef<'a>,
  font_size: f32,
  label_text_height: i32,
  label_char_width: f32,
}

impl Default for Draw<'_> {
  fn default() -> Self {
    let font_data = include_bytes!("../../assets/DejaVuSans.ttf");
    let font = FontRef::try_from_slice(font_data).expect("无法加载嵌入的字体文件");

    Self {
      font,
      font_size: LABEL_FONT_SIZE,
      label_text_height: LABEL_TEXT_HEIGHT,
      label_char_width: LABEL_CHAR_WIDTH,
    }
  }
}

impl Draw<'_> {
  /// 将一组聚合条目绘制到图像上，按放行策略过滤
  ///
  /// 图像被就地修改；函数不保留对图像的引用。
  pub fn draw_entries(
    &self,
    image: &mut RgbImage,
    entries: &BoxEntries,
    options: &VisualizeOptions,
  ) -> RenderOutcome {
    let mut drawn = Vec::new();

    for (key, entry) in entries.iter() {
      if !options.match_policy.admits(&entry.labels) {
        continue;
      }
      self.draw_box_with_labels(image, key, entry, options);
      if let Some(first) = entry.labels.first() {
        drawn.push(first.clone());
      }
    }

    RenderOutcome {
      detected: !drawn.is_empty(),
      note: drawn.join(","),
    }
  }

  /// 绘制一个框与其叠放标签
  fn draw_box_with_labels(
    &self,
    image: &mut RgbImage,
    key: &BoxKey,
    entry: &DisplayEntry,
    options: &VisualizeOptions,
  ) {
    // 空图无处可画
    if image.width() == 0 || image.height() == 0 {
      return;
    }

    let (w, h) = (image.width() as f32, image.height() as f32);

    // 归一化坐标映射到像素，绝对坐标原样使用
    let (left, right, top, bottom) = if options.normalized_coordinates {
      (
        key.xmin() * w,
        key.xmax() * w,
        key.ymin() * h,
        key.ymax() * h,
      )
    } else {
      (key.xmin(), key.xmax(), key.ymin(), key.ymax())
    };

    self.draw_outline(image, left, top, right, bottom, entry.color, options.line_thickness);
    self.draw_label_stack(image, left, top, bottom, entry);
  }

  /// 绘制边框，线宽通过嵌套空心矩形实现
  fn draw_outline(
    &self,
    image: &mut RgbImage,
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    color: Rgb<u8>,
    thickness: u32,
  ) {
    let (w, h) = (image.width() as i32, image.height() as i32);

    let x_min = (left.floor() as i32).clamp(0, w - 1);
    let y_min = (top.floor() as i32).clamp(0, h - 1);
    let x_max = (right.ceil() as i32).clamp(0, w - 1);
    let y_max = (bottom.ceil() as i32).clamp(0, h - 1);

    if x_min >= x_max || y_min >= y_max {
      return;
    }

    // 边界像素含两端
    for t in 0..thickness as i32 {
      let width = (x_max - x_min + 1 - 2 * t).max(0) as u32;
      let height = (y_max - y_min + 1 - 2 * t).max(0) as u32;
      if width == 0 || height == 0 {
        break;
      }
      let rect = Rect::at(x_min + t, y_min + t).of_size(width, height);
      draw_hollow_rect_mut(image, rect, color);
    }
  }

  /// 自下而上叠放标签块
  ///
  /// 每条标签带有按自身文本量算出的底色矩形与 5% 的上下边距，
  /// 默认贴着框顶排布；当框顶距图像顶部不足以容纳整叠标签时，
  /// 改为贴着框底向下排布（防裁剪规则）。
  fn draw_label_stack(
    &self,
    image: &mut RgbImage,
    left: f32,
    top: f32,
    bottom: f32,
    entry: &DisplayEntry,
  ) {
    if entry.labels.is_empty() {
      return;
    }

    let (w, _h) = (image.width() as i32, image.height() as i32);

    let text_height = self.label_text_height;
    let margin = (0.05 * text_height as f32).ceil() as i32;
    let block_height = text_height + 2 * margin;
    let total_height = block_height * entry.labels.len() as i32;

    let mut text_bottom = if top as i32 > total_height {
      top as i32
    } else {
      bottom as i32 + total_height
    };

    let label_x = (left as i32).max(0);
    let scale = PxScale::from(self.font_size);

    for label in entry.labels.iter().rev() {
      let text_width = (label.len() as f32 * self.label_char_width) as i32;
      let label_y = (text_bottom - block_height).max(0);

      // 底色矩形不越过图像右边界
      let max_width = (w - label_x).max(0);
      let label_width = text_width.min(max_width) as u32;

      if label_width > 0 && block_height > 0 {
        let rect = Rect::at(label_x, label_y).of_size(label_width, block_height as u32);
        draw_filled_rect_mut(image, rect, entry.color);

        draw_text_mut(
          image,
          LABEL_TEXT_COLOR,
          label_x + margin,
          label_y + margin,
          scale,
          &self.font,
          label,
        );
      }

      text_bottom -= block_height;
    }
  }
}
