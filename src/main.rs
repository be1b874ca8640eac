// 该文件是 Qifang （漆坊） 项目的一部分。
// src/main.rs - 项目主程序
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

mod args;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use qifang::FromUrl;
use qifang::category::CategoryIndex;
use qifang::counting::overlay_and_count;
use qifang::input::{DetectionFileInput, ImageFileInput};
use qifang::output::{OutputWrapper, Persist};
use qifang::visualize::{
  MatchPolicy, SINGLE_IMAGE_MIN_SCORE, TARGET_MIN_SCORE, VisualizeOptions,
};

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = args::Args::parse();

  info!("图像来源: {}", args.image);
  info!("检测来源: {}", args.detections);
  info!("标签文件: {}", args.labels);
  info!("输出路径: {}", args.output);

  let mut image = ImageFileInput::from_url(&args.image)?.into_image();
  let arrays = DetectionFileInput::from_url(&args.detections)?.into_arrays();
  let index = CategoryIndex::from_path(&args.labels)?;
  let output = OutputWrapper::from_url(&args.output)?;

  info!(
    "图像 {}x{}，共 {} 条检测，{} 个已知类别",
    image.width(),
    image.height(),
    arrays.len(),
    index.len()
  );

  // 目标子集模式与全量模式的历史默认阈值不同
  let (match_policy, default_threshold) = if let Some(targets) = &args.targets {
    let set: Vec<String> = targets
      .split(',')
      .map(|s| s.trim().to_string())
      .filter(|s| !s.is_empty())
      .collect();
    (MatchPolicy::PrefixSet(set), TARGET_MIN_SCORE)
  } else if let Some(target) = &args.target {
    (
      MatchPolicy::Substring(target.clone()),
      SINGLE_IMAGE_MIN_SCORE,
    )
  } else {
    (MatchPolicy::All, SINGLE_IMAGE_MIN_SCORE)
  };

  let max_boxes = (args.max_boxes > 0).then_some(args.max_boxes);
  let mut options = VisualizeOptions::default()
    .with_threshold(args.threshold.unwrap_or(default_threshold))
    .with_max_boxes(max_boxes)
    .with_match_policy(match_policy)
    .with_line_thickness(args.thickness)
    .agnostic(args.agnostic);
  if args.absolute_coords {
    options = options.absolute_coordinates();
  }

  let now = std::time::Instant::now();
  let report = overlay_and_count(&mut image, arrays.iter(), &index, &options);
  info!("标注完成，耗时: {:.2?}", now.elapsed());

  println!("图中识别到以下对象:");
  println!("{}", report.summary);
  if report.outcome.detected {
    info!("已绘制: {}", report.outcome.note);
  } else {
    info!("没有框通过过滤，图像保持原样");
  }

  output.persist(&image, &report)?;

  Ok(())
}
