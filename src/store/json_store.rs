use super::{ArtistRecord, VideoRecord, VideoStore};
use anyhow::{Context, Result, anyhow};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Library {
    #[serde(default)]
    artists: Vec<ArtistRecord>,
    #[serde(default)]
    videos: Vec<VideoRecord>,
}

/// 以 JSON 檔案保存的影片資料庫
///
/// 所有更新都在同一把鎖內完成並立即寫回檔案，
/// 可安全地由多個平行處理的流程共用。
#[derive(Debug)]
pub struct JsonVideoStore {
    path: PathBuf,
    library: Mutex<Library>,
}

impl JsonVideoStore {
    pub fn open(path: &Path) -> Result<Self> {
        let library = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("無法讀取影片資料庫: {}", path.display()))?;
            if content.trim().is_empty() {
                Library::default()
            } else {
                serde_json::from_str(&content)
                    .with_context(|| format!("無法解析影片資料庫: {}", path.display()))?
            }
        } else {
            Library::default()
        };

        debug!(
            "載入影片資料庫 {}: {} 位藝人, {} 支影片",
            path.display(),
            library.artists.len(),
            library.videos.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            library: Mutex::new(library),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 新增藝人與影片（匯入工具與測試使用），並寫回檔案
    pub fn insert(&self, artists: Vec<ArtistRecord>, videos: Vec<VideoRecord>) -> Result<()> {
        let mut library = self.lock()?;
        let mut updated = library.clone();
        updated.artists.extend(artists);
        updated.videos.extend(videos);
        self.persist(&updated)?;
        *library = updated;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Library>> {
        self.library
            .lock()
            .map_err(|_| anyhow!("影片資料庫鎖定失敗"))
    }

    /// 先寫入暫存檔再 rename，避免寫到一半的資料庫
    fn persist(&self, library: &Library) -> Result<()> {
        let content =
            serde_json::to_string_pretty(library).context("無法序列化影片資料庫")?;

        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(parent)
            .with_context(|| format!("無法建立目錄: {}", parent.display()))?;

        let file_name = self
            .path
            .file_name()
            .map_or_else(|| "videos.json".to_string(), |n| n.to_string_lossy().to_string());
        let temp_path = parent.join(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));

        fs::write(&temp_path, content)
            .with_context(|| format!("無法寫入暫存檔: {}", temp_path.display()))?;
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e)
                .with_context(|| format!("無法更新影片資料庫: {}", self.path.display()));
        }

        Ok(())
    }
}

impl VideoStore for JsonVideoStore {
    fn get_artist_by_id(&self, artist_id: u64) -> Result<ArtistRecord> {
        self.lock()?
            .artists
            .iter()
            .find(|a| a.id == artist_id)
            .cloned()
            .ok_or_else(|| anyhow!("找不到藝人 ID {artist_id}"))
    }

    fn get_video_by_id(&self, video_id: u64) -> Result<VideoRecord> {
        self.lock()?
            .videos
            .iter()
            .find(|v| v.id == video_id)
            .cloned()
            .ok_or_else(|| anyhow!("找不到影片 ID {video_id}"))
    }

    fn get_videos(&self) -> Result<Vec<VideoRecord>> {
        Ok(self.lock()?.videos.clone())
    }

    fn set_video_frames(
        &self,
        video_id: u64,
        frames_directory: Option<&str>,
        thumbnail_file: Option<&str>,
        preview_file: Option<&str>,
    ) -> Result<()> {
        let mut library = self.lock()?;

        let mut updated = library.clone();
        let video = updated
            .videos
            .iter_mut()
            .find(|v| v.id == video_id)
            .ok_or_else(|| anyhow!("找不到影片 ID {video_id}"))?;

        if let Some(dir) = frames_directory {
            video.frames_directory = Some(dir.to_string());
        }
        if let Some(file) = thumbnail_file {
            video.thumbnail_file = Some(file.to_string());
        }
        if let Some(file) = preview_file {
            video.preview_file = Some(file.to_string());
        }

        // 寫檔成功後才更新記憶體中的資料
        self.persist(&updated)?;
        *library = updated;

        debug!("已更新影片 {video_id} 的影格欄位");
        Ok(())
    }
}
