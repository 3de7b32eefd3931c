//! 影片資料庫
//!
//! 流程只依賴 [`VideoStore`] 提供的查詢與更新能力，
//! [`JsonVideoStore`] 是以 JSON 檔案保存的預設實作。

mod json_store;

pub use json_store::JsonVideoStore;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRecord {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: u64,
    #[serde(rename = "artistid")]
    pub artist_id: u64,
    pub name: String,
    /// 相對於音樂根目錄的影片路徑
    pub path: PathBuf,
    /// 相對於影格快取根目錄的子目錄
    #[serde(rename = "framesdirectory", default, skip_serializing_if = "Option::is_none")]
    pub frames_directory: Option<String>,
    #[serde(rename = "thumbnailfile", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_file: Option<String>,
    #[serde(rename = "previewfile", default, skip_serializing_if = "Option::is_none")]
    pub preview_file: Option<String>,
}

pub trait VideoStore: Send + Sync {
    fn get_artist_by_id(&self, artist_id: u64) -> Result<ArtistRecord>;

    fn get_video_by_id(&self, video_id: u64) -> Result<VideoRecord>;

    fn get_videos(&self) -> Result<Vec<VideoRecord>>;

    /// Update the cache fields of a video in one step.
    ///
    /// `None` leaves the corresponding field unchanged.
    fn set_video_frames(
        &self,
        video_id: u64,
        frames_directory: Option<&str>,
        thumbnail_file: Option<&str>,
        preview_file: Option<&str>,
    ) -> Result<()>;
}
