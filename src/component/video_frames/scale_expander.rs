//! 縮放版本的擴充點
//!
//! 縮放後的檔案與原檔放在同一目錄，檔名在副檔名前加上 ` ($s×$s)`，
//! 例如 `frame-05 (100×100).jpg`。`$s` 為輸出寬度，高度依原比例。
//! 實作可以只支援部分格式，但絕不能修改原始檔案。

use super::engine::EngineError;
use super::main::VideoFrames;
use crate::config::AccessPolicy;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// 縮放標記使用的乘號（U+00D7）
const SCALE_SEPARATOR: char = '\u{00D7}';

pub trait ScaleExpander: Send + Sync {
    /// 為 `base` 產生每個邊長的縮放版本，回傳已建立的檔案
    fn expand_scales(&self, base: &Path, edges: &[u32]) -> Result<Vec<PathBuf>, EngineError>;
}

/// 不產生任何縮放版本
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScaling;

impl ScaleExpander for NoScaling {
    fn expand_scales(&self, _base: &Path, _edges: &[u32]) -> Result<Vec<PathBuf>, EngineError> {
        Ok(Vec::new())
    }
}

#[must_use]
pub fn scaled_file_name(file_name: &str, edge: u32) -> String {
    let tag = format!(" ({edge}{SCALE_SEPARATOR}{edge})");
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}{tag}.{ext}"),
        _ => format!("{file_name}{tag}"),
    }
}

#[must_use]
pub fn scaled_path(base: &Path, edge: u32) -> PathBuf {
    let file_name = base
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    base.with_file_name(scaled_file_name(&file_name, edge))
}

impl VideoFrames {
    /// 產生設定中所有邊長的縮放版本；失敗不影響流程
    pub(super) fn expand_scales(&self, base: &Path) {
        if self.scales.is_empty() {
            return;
        }

        match self.engines.scaler.expand_scales(base, &self.scales) {
            Ok(scaled) => {
                for path in &scaled {
                    self.apply_attributes(path, AccessPolicy::FILE_MODE);
                }
                debug!("已建立 {} 個縮放版本: {}", scaled.len(), base.display());
            }
            Err(EngineError::Unsupported(reason)) => {
                debug!("略過縮放版本: {reason}");
            }
            Err(e) => warn!(
                "縮放 {} 失敗: {e}（繼續處理，不產生縮放版本）",
                base.display()
            ),
        }
    }
}
