use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_FRAME_COUNT: usize = 5;
pub const DEFAULT_PREVIEW_LENGTH: u32 = 3;
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// 音樂（影片來源）根目錄與檔案擁有者設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicSettings {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Default for MusicSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/data/music"),
            owner: None,
            group: None,
        }
    }
}

/// 影格快取設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoFramesSettings {
    /// 快取根目錄，每支影片在底下有自己的子目錄
    pub path: PathBuf,
    /// 每支影片擷取的影格數量
    pub frames: usize,
    /// 縮放版本的邊長（像素）
    pub scales: Vec<u32>,
    /// 預覽動畫一次循環的總秒數
    pub preview_length: u32,
    /// 單次 ffmpeg/ffprobe 呼叫的逾時秒數，未設定則不限制
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_timeout_secs: Option<u64>,
    /// JSON 影片資料庫檔案
    pub store_path: PathBuf,
}

impl Default for VideoFramesSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/data/videoframes"),
            frames: DEFAULT_FRAME_COUNT,
            scales: vec![50, 150],
            preview_length: DEFAULT_PREVIEW_LENGTH,
            engine_timeout_secs: None,
            store_path: PathBuf::from("videos.json"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub music: MusicSettings,
    #[serde(rename = "videoframes", default)]
    pub video_frames: VideoFramesSettings,
}

/// 建立檔案與目錄時套用的擁有者與權限
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    pub owner: Option<String>,
    pub group: Option<String>,
}

impl AccessPolicy {
    /// rwxrwxr-x
    pub const DIRECTORY_MODE: u32 = 0o775;
    /// rw-rw-r--
    pub const FILE_MODE: u32 = 0o664;
}

impl Config {
    #[must_use]
    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy {
            owner: self.music.owner.clone(),
            group: self.music.group.clone(),
        }
    }
}
