use super::main::VideoFrames;
use crate::error::{FramesError, FramesResult};
use crate::tools::{FramesDirectory, is_plain_relative};
use log::{error, info};

fn is_plain_file_name(name: &str) -> bool {
    !name.contains('/') && is_plain_relative(name)
}

impl VideoFrames {
    /// 設定影片在資料庫中的影格目錄、縮圖與預覽動畫
    ///
    /// 縮圖與預覽為 `None` 時資料庫中的值不變。更新前會確認目錄與檔案都存在，
    /// 任何一項不存在就不會變更資料庫。
    pub fn set_video_frames(
        &self,
        video_id: u64,
        frames_directory: &FramesDirectory,
        thumbnail_file: Option<&str>,
        preview_file: Option<&str>,
    ) -> FramesResult<()> {
        let directory = self.absolute_path(frames_directory);
        if !is_plain_relative(frames_directory.as_str()) || !directory.is_dir() {
            error!("影格目錄 \"{frames_directory}\" 不存在於快取根目錄中");
            return Err(FramesError::PublishPrecondition(format!(
                "frames directory \"{frames_directory}\" does not exist"
            )));
        }

        for (kind, file) in [("縮圖", thumbnail_file), ("預覽", preview_file)] {
            let Some(file) = file else { continue };
            if !is_plain_file_name(file) || !directory.join(file).is_file() {
                error!("{kind}檔案 \"{file}\" 不存在於影格目錄 \"{frames_directory}\"");
                return Err(FramesError::PublishPrecondition(format!(
                    "{kind}檔案 \"{file}\" 不存在於 \"{frames_directory}\""
                )));
            }
        }

        self.store
            .set_video_frames(
                video_id,
                Some(frames_directory.as_str()),
                thumbnail_file,
                preview_file,
            )
            .map_err(|e| FramesError::StoreUpdate {
                video_id,
                reason: format!("{e:#}"),
            })?;

        info!("影片 {video_id} 已連結影格目錄 \"{frames_directory}\"");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_plain_file_name() {
        assert!(is_plain_file_name("frame-01.jpg"));
        assert!(is_plain_file_name("preview (150×150).webp"));
        assert!(!is_plain_file_name("../frame-01.jpg"));
        assert!(!is_plain_file_name("sub/frame-01.jpg"));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name(""));
    }
}
