// 该文件是 Qifang （漆坊） 项目的一部分。
// src/output/directory_record.rs - 目录记录输出
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{Datelike, Utc};
use image::RgbImage;
use thiserror::Error;

use crate::counting::CountReport;
use crate::output::Persist;
use crate::{FromUrl, FromUrlWithScheme};

#[derive(Error, Debug)]
pub enum DirectoryRecordOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("记录序列化错误: {0}")]
  RecordError(#[from] serde_json::Error),
}

/// 按日期分桶保存标注图像与清单记录，URI 形如 `folder:///data/nest?record`
///
/// 默认只在真的绘制了框时落盘（用于区分"干净"与"标记"两种结果），
/// 带 `always` 查询参数时无条件落盘；带 `record` 查询参数时同时写出
/// 一份同名 `.txt` 清单记录。
pub struct DirectoryRecordOutput {
  directory: PathBuf,
  record: bool,
  always: bool,
  frame_counters: Arc<Mutex<u16>>,
}

impl FromUrlWithScheme for DirectoryRecordOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn from_url(uri: &url::Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(DirectoryRecordOutputError::SchemeMismatch);
    }

    let record = uri.query_pairs().any(|(k, _)| k == "record");
    let always = uri.query_pairs().any(|(k, _)| k == "always");

    Ok(DirectoryRecordOutput {
      directory: PathBuf::from(uri.path()),
      record,
      always,
      frame_counters: Arc::new(Mutex::new(0)),
    })
  }
}

impl DirectoryRecordOutput {
  fn frame_id(&self) -> u16 {
    let mut counter = self.frame_counters.lock().unwrap();
    let id = counter.wrapping_add(1);
    *counter = id;
    id
  }

  fn frame_path(&self) -> Result<PathBuf, DirectoryRecordOutputError> {
    let now = Utc::now();
    let directory = self
      .directory
      .join(now.year().to_string())
      .join(format!("{:02}", now.month()))
      .join(format!("{:02}", now.day()));
    if !directory.exists() {
      std::fs::create_dir_all(&directory)?;
    }

    Ok(directory.join(format!(
      "{}-{:04X}.png",
      now.format("%H-%M-%S"),
      self.frame_id()
    )))
  }

  fn write_record(
    &self,
    path: &PathBuf,
    report: &CountReport,
  ) -> Result<(), DirectoryRecordOutputError> {
    let record = format!(
      "{}\nsummary: {}\ncounts: {}\nnote: {}\n",
      Utc::now().to_rfc3339(),
      report.summary,
      serde_json::to_string(&report.counts)?,
      report.outcome.note,
    );
    std::fs::write(path.with_extension("txt"), record)?;
    Ok(())
  }
}

impl Persist for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn persist(&self, image: &RgbImage, report: &CountReport) -> Result<(), Self::Error> {
    if !self.always && !report.outcome.detected {
      return Ok(());
    }

    let path = self.frame_path()?;
    image.save(&path)?;
    if self.record {
      self.write_record(&path, report)?;
    }
    Ok(())
  }
}
