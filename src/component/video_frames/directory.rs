use super::main::VideoFrames;
use crate::config::AccessPolicy;
use crate::error::{FramesError, FramesResult};
use crate::tools::{
    FramesDirectory, ensure_directory_exists, frames_directory_name, is_plain_relative,
    set_attributes,
};
use log::{debug, warn};
use std::path::{Path, PathBuf};

impl VideoFrames {
    #[must_use]
    pub fn absolute_path(&self, frames_directory: &FramesDirectory) -> PathBuf {
        self.frames_root.join(frames_directory)
    }

    /// 建立影片的影格子目錄並回傳其名稱
    ///
    /// 擁有者與群組使用設定檔中的 music owner/group，權限為 `rwxrwxr-x`。
    pub fn create_frames_directory(
        &self,
        artist_name: &str,
        video_name: &str,
    ) -> FramesResult<FramesDirectory> {
        let frames_directory = frames_directory_name(artist_name, video_name);
        self.ensure_frames_directory(&frames_directory)?;
        Ok(frames_directory)
    }

    /// 目錄已存在時不會重新建立，影片目錄的權限仍會重新套用
    ///
    /// 藝人目錄只在這次新建時才設定權限，既有目錄保留原本的擁有者與權限。
    pub fn ensure_frames_directory(&self, frames_directory: &FramesDirectory) -> FramesResult<()> {
        if !is_plain_relative(frames_directory.as_str()) {
            return Err(FramesError::Validation(format!(
                "無效的影格目錄名稱 \"{frames_directory}\""
            )));
        }

        let absolute = self.absolute_path(frames_directory);
        let new_artist_directory = absolute.parent().filter(|parent| !parent.is_dir());

        if ensure_directory_exists(&absolute)? {
            debug!("建立影格目錄 {}", absolute.display());
        }

        if let Some(artist_directory) = new_artist_directory {
            self.apply_attributes(artist_directory, AccessPolicy::DIRECTORY_MODE);
        }
        self.apply_attributes(&absolute, AccessPolicy::DIRECTORY_MODE);

        Ok(())
    }

    /// 設定失敗只記錄警告，保留原本的權限
    pub(super) fn apply_attributes(&self, path: &Path, mode: u32) {
        if let Err(e) = set_attributes(path, &self.policy, mode) {
            warn!(
                "設定 {} 的擁有者與權限失敗: {e:#}（保留原本的設定）",
                path.display()
            );
        }
    }
}
