// 该文件是 Qifang （漆坊） 项目的一部分。
// src/args.rs - 项目参数配置
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use clap::Parser;
use url::Url;

/// Qifang 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 待标注的图像来源
  /// 支持格式: image:///path/to/photo.jpg
  #[arg(long, value_name = "SOURCE")]
  pub image: Url,

  /// 检测结果来源（外部推理服务的原始输出）
  /// 支持格式: detections:///path/to/result.json
  #[arg(long, value_name = "SOURCE")]
  pub detections: Url,

  /// 标签文件路径（JSON 数组，类别编号到显示名称）
  #[arg(long, value_name = "FILE")]
  pub labels: String,

  /// 输出路径
  /// 支持格式:
  /// - 单文件: image:///path/to/out.png
  /// - 目录记录: folder:///data/records?record
  #[arg(long, value_name = "OUTPUT")]
  pub output: Url,

  /// 置信度阈值 (0.0 - 1.0)，缺省按模式取历史默认值
  #[arg(long, value_name = "THRESHOLD")]
  pub threshold: Option<f32>,

  /// 最多处理的框数（0 表示不限）
  #[arg(long, default_value = "20", value_name = "COUNT")]
  pub max_boxes: usize,

  /// 边框线宽（像素）
  #[arg(long, default_value = "4", value_name = "PIXELS")]
  pub thickness: u32,

  /// 目标标签集合（逗号分隔），给定时进入目标子集模式
  #[arg(long, value_name = "LABELS")]
  pub targets: Option<String>,

  /// 单目标子串，只统计首标签包含该子串的框
  #[arg(long, value_name = "LABEL", conflicts_with = "targets")]
  pub target: Option<String>,

  /// 类别无关模式：只报告置信度，不解析类别
  #[arg(long)]
  pub agnostic: bool,

  /// 检测框使用像素坐标而不是归一化坐标
  #[arg(long)]
  pub absolute_coords: bool,
}
