// 该文件是 Qifang （漆坊） 项目的一部分。
// tests/pipeline.rs - 端到端流水线测试
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::RgbImage;
use url::Url;

use qifang::FromUrl;
use qifang::category::CategoryIndex;
use qifang::counting::{single_image_counting, target_counting};
use qifang::input::{DetectionFileInput, ImageFileInput};
use qifang::output::{OutputWrapper, Persist};

const LABELS_JSON: &str = r#"[
  {"id": 1, "name": "Red"},
  {"id": 2, "name": "Blue"},
  {"id": 3, "name": "Green"}
]"#;

const DETECTIONS_JSON: &str = r#"{
  "boxes": [
    [0.10, 0.10, 0.30, 0.30],
    [0.40, 0.40, 0.60, 0.60],
    [0.70, 0.70, 0.90, 0.90]
  ],
  "classes": [1, 1, 2],
  "scores": [0.95, 0.92, 0.88]
}"#;

fn file_url(scheme: &str, path: &std::path::Path) -> Url {
  Url::parse(&format!("{}://{}", scheme, path.display())).unwrap()
}

#[test]
fn files_to_annotated_image_and_inventory() {
  let dir = tempfile::tempdir().unwrap();

  let image_path = dir.path().join("input.png");
  RgbImage::new(640, 480).save(&image_path).unwrap();
  let detections_path = dir.path().join("detections.json");
  std::fs::write(&detections_path, DETECTIONS_JSON).unwrap();
  let labels_path = dir.path().join("labels.json");
  std::fs::write(&labels_path, LABELS_JSON).unwrap();

  let mut image = ImageFileInput::from_url(&file_url("image", &image_path))
    .unwrap()
    .into_image();
  let arrays = DetectionFileInput::from_url(&file_url("detections", &detections_path))
    .unwrap()
    .into_arrays();
  let index = CategoryIndex::from_path(&labels_path).unwrap();

  let report = single_image_counting(&mut image, arrays.iter(), &index, None);

  assert_eq!(report.summary, "Red: 2, Blue: 1");
  assert!(report.outcome.detected);

  // 标注后的图像可以经由输出层落盘
  let out_path = dir.path().join("annotated.png");
  let output = OutputWrapper::from_url(&file_url("image", &out_path)).unwrap();
  output.persist(&image, &report).unwrap();
  assert!(out_path.exists());

  let saved = image::open(&out_path).unwrap().to_rgb8();
  assert_eq!(saved.dimensions(), (640, 480));
  // 落盘的就是标注过的缓冲区
  assert!(saved.pixels().any(|p| *p != image::Rgb([0, 0, 0])));
}

#[test]
fn targeted_mode_flags_only_requested_labels() {
  let dir = tempfile::tempdir().unwrap();

  let detections_path = dir.path().join("detections.json");
  std::fs::write(&detections_path, DETECTIONS_JSON).unwrap();
  let arrays = DetectionFileInput::from_url(&file_url("detections", &detections_path))
    .unwrap()
    .into_arrays();
  let index = CategoryIndex::from_json(LABELS_JSON).unwrap();

  let mut image = RgbImage::new(640, 480);
  let report = target_counting(
    &mut image,
    arrays.iter(),
    &index,
    &["Blue".to_string(), "Green".to_string()],
  );

  assert_eq!(report.summary, "Blue: 1");
  assert_eq!(report.counts.get("Red"), None);
  assert_eq!(report.outcome.note, "Blue: 88%");
}

#[test]
fn directory_record_skips_clean_results() {
  let dir = tempfile::tempdir().unwrap();
  let records = dir.path().join("records");

  let output = OutputWrapper::from_url(&file_url("folder", &records)).unwrap();
  let index = CategoryIndex::from_json(LABELS_JSON).unwrap();

  // 没有检测过阈值，不应该写任何文件
  let mut image = RgbImage::new(64, 64);
  let report = single_image_counting(&mut image, Vec::new(), &index, None);
  assert!(!report.outcome.detected);
  output.persist(&image, &report).unwrap();
  assert!(!records.exists());
}
