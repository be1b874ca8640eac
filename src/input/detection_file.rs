// 该文件是 Qifang （漆坊） 项目的一部分。
// src/input/detection_file.rs - 检测结果文件输入
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use thiserror::Error;
use url::Url;

use crate::detection::DetectionArrays;
use crate::{FromUrl, FromUrlWithScheme};

#[derive(Error, Debug)]
pub enum DetectionFileInputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("检测文件解析错误: {0}")]
  ParseError(#[from] serde_json::Error),
}

/// 模型输出的检测结果文件，URI 形如 `detections:///path/to/result.json`
///
/// 文件内容为平行数组 JSON：`{"boxes": [[…]], "classes": […], "scores": […]}`，
/// 与外部推理服务的原始输出形状一致。
pub struct DetectionFileInput {
  arrays: DetectionArrays,
}

impl FromUrlWithScheme for DetectionFileInput {
  const SCHEME: &'static str = "detections";
}

impl FromUrl for DetectionFileInput {
  type Error = DetectionFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(DetectionFileInputError::SchemeMismatch);
    }

    let text = std::fs::read_to_string(url.path())?;
    let arrays: DetectionArrays = serde_json::from_str(&text)?;

    Ok(DetectionFileInput { arrays })
  }
}

impl DetectionFileInput {
  pub fn into_arrays(self) -> DetectionArrays {
    self.arrays
  }
}
