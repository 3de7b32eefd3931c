use super::frame_extractor::frame_file_name;
use super::main::VideoFrames;
use crate::config::AccessPolicy;
use crate::error::{FramesError, FramesResult};
use crate::tools::FramesDirectory;
use log::{error, warn};
use std::path::PathBuf;

pub const PREVIEW_FILE: &str = "preview.webp";

/// 每張影格的顯示時間（毫秒，無條件捨去）
#[must_use]
pub fn frame_duration_ms(preview_length_secs: u32, frame_count: usize) -> u64 {
    if frame_count == 0 {
        return 0;
    }
    u64::from(preview_length_secs) * 1000 / frame_count as u64
}

impl VideoFrames {
    /// 將 `frame-01.jpg` 到 `frame-NN.jpg` 合成為無限循環的 `preview.webp`
    ///
    /// 找不到的影格只會記錄警告並略過；少於兩張時無法產生動畫。
    pub fn compose_preview(
        &self,
        frames_directory: &FramesDirectory,
        frame_count: usize,
        preview_length_secs: u32,
    ) -> FramesResult<PathBuf> {
        let directory = self.absolute_path(frames_directory);

        let frames: Vec<PathBuf> = (1..=frame_count)
            .map(|number| directory.join(frame_file_name(number)))
            .filter(|path| {
                let exists = path.is_file();
                if !exists {
                    warn!("無法載入影格 \"{}\"（略過此影格）", path.display());
                }
                exists
            })
            .collect();

        if frames.len() < 2 {
            error!(
                "載入的影格不足，無法產生預覽動畫 ({} < 2)",
                frames.len()
            );
            return Err(FramesError::InsufficientFrames {
                loaded: frames.len(),
            });
        }

        let preview_path = directory.join(PREVIEW_FILE);
        let duration = frame_duration_ms(preview_length_secs, frame_count);

        self.engines
            .animation
            .compose_animation(&frames, duration, true, &preview_path)
            .map_err(|e| {
                e.into_frames_error(|e| FramesError::EncodingFailure {
                    path: preview_path.clone(),
                    reason: e.to_string(),
                })
            })?;

        if !preview_path.is_file() {
            return Err(FramesError::EncodingFailure {
                path: preview_path,
                reason: "animation file was not created".to_string(),
            });
        }

        self.apply_attributes(&preview_path, AccessPolicy::FILE_MODE);
        self.expand_scales(&preview_path);

        Ok(preview_path)
    }
}
