use super::main::VideoFrames;
use crate::config::AccessPolicy;
use crate::error::{FramesError, FramesResult};
use crate::tools::{FramesDirectory, select_timestamps};
use log::debug;
use std::path::Path;

/// 影格檔名：`frame-NN.jpg`，NN 為從 1 開始的兩位數編號
#[must_use]
pub fn frame_file_name(number: usize) -> String {
    format!("frame-{number:02}.jpg")
}

impl VideoFrames {
    /// 從影片擷取 `frame_count` 張影格到影格子目錄
    ///
    /// 影片長度切成 `frame_count + 1` 段，取每段的中點附近作為擷取時間，
    /// 避開片頭與片尾。任何一張擷取失敗都會中止並回傳錯誤；
    /// 已寫入的檔案保留在磁碟上，下次執行時會被覆寫。
    pub fn extract_frames(
        &self,
        frames_directory: &FramesDirectory,
        video_path: &Path,
        frame_count: usize,
    ) -> FramesResult<()> {
        let source = self.music_root.join(video_path);

        let duration = self.engines.probe.duration(&source).map_err(|e| {
            e.into_frames_error(|e| FramesError::MetadataUnavailable {
                path: source.clone(),
                reason: e.to_string(),
            })
        })?;

        let timestamps = select_timestamps(duration, frame_count);
        if timestamps.is_empty() {
            return Err(FramesError::MetadataUnavailable {
                path: source,
                reason: format!("no sample instants for duration {duration}s and {frame_count} frames"),
            });
        }

        let directory = self.absolute_path(frames_directory);

        for (index, &timestamp) in timestamps.iter().enumerate() {
            let frame_path = directory.join(frame_file_name(index + 1));
            debug!(
                "擷取第 {} 張影格: {} @ {timestamp:.3}s",
                index + 1,
                source.display()
            );

            self.engines
                .frames
                .extract_frame(&source, timestamp, true, &frame_path)
                .map_err(|e| {
                    e.into_frames_error(|e| FramesError::ExtractionFailure {
                        path: source.clone(),
                        timestamp,
                        reason: e.to_string(),
                    })
                })?;

            self.apply_attributes(&frame_path, AccessPolicy::FILE_MODE);
            self.expand_scales(&frame_path);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_file_name() {
        assert_eq!(frame_file_name(1), "frame-01.jpg");
        assert_eq!(frame_file_name(5), "frame-05.jpg");
        assert_eq!(frame_file_name(12), "frame-12.jpg");
    }
}
