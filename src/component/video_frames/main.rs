use super::engine::Engines;
use super::frame_extractor::frame_file_name;
use super::preview_composer::PREVIEW_FILE;
use crate::config::{AccessPolicy, Config};
use crate::error::{FramesError, FramesResult};
use crate::store::{VideoRecord, VideoStore};
use crate::tools::FramesDirectory;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 單支影片的處理狀態
///
/// `Start → DirectoryReady → FramesReady → PreviewReady → Published`，
/// 任何一步失敗都直接進入 `Failed`，後續步驟不再執行。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    DirectoryReady,
    FramesReady,
    PreviewReady,
    Published,
    Failed,
}

#[derive(Debug)]
pub struct PipelineOutcome {
    pub state: PipelineState,
    /// 失敗前最後完成的狀態
    pub reached: PipelineState,
    pub frames_directory: Option<FramesDirectory>,
    pub error: Option<FramesError>,
}

impl PipelineOutcome {
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.state == PipelineState::Published
    }
}

/// 影片影格與預覽動畫快取
///
/// 每支影片在快取根目錄下有 `$Artistname/$Videoname` 子目錄，內含
/// `frame-NN.jpg` 影格、`preview.webp` 預覽動畫與各自的縮放版本。
///
/// 更新流程：
/// 1. 建立子目錄（[`Self::create_frames_directory`]）
/// 2. 擷取影格（[`Self::extract_frames`]）
/// 3. 合成預覽動畫（[`Self::compose_preview`]）
/// 4. 確認檔案存在後更新資料庫（[`Self::set_video_frames`]）
pub struct VideoFrames {
    pub(super) music_root: PathBuf,
    pub(super) frames_root: PathBuf,
    pub(super) frame_count: usize,
    pub(super) preview_length: u32,
    pub(super) scales: Vec<u32>,
    pub(super) policy: AccessPolicy,
    pub(super) store: Arc<dyn VideoStore>,
    pub(super) engines: Engines,
}

impl VideoFrames {
    pub fn new(
        config: &Config,
        store: Arc<dyn VideoStore>,
        engines: Engines,
    ) -> FramesResult<Self> {
        config.validate()?;

        Ok(Self {
            music_root: config.music.path.clone(),
            frames_root: config.video_frames.path.clone(),
            frame_count: config.video_frames.frames,
            preview_length: config.video_frames.preview_length,
            scales: config.video_frames.scales.clone(),
            policy: config.access_policy(),
            store,
            engines,
        })
    }

    #[must_use]
    pub fn frames_root(&self) -> &Path {
        &self.frames_root
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn VideoStore> {
        &self.store
    }

    /// 更新一支影片的影格與預覽動畫，成功回傳 `true`
    ///
    /// 失敗原因只會寫入日誌。
    pub fn update_video_frames(&self, video: &VideoRecord) -> bool {
        self.run(video).is_published()
    }

    /// 執行完整流程並回傳最終狀態
    ///
    /// 重複執行會覆寫既有檔案，不會產生額外的檔案或目錄。
    pub fn run(&self, video: &VideoRecord) -> PipelineOutcome {
        info!("更新影格與預覽動畫: {}", video.path.display());

        let mut reached = PipelineState::Start;
        match self.run_steps(video, &mut reached) {
            Ok(frames_directory) => {
                info!("影片 {} 的影格已發布至 {frames_directory}", video.id);
                PipelineOutcome {
                    state: PipelineState::Published,
                    reached: PipelineState::Published,
                    frames_directory: Some(frames_directory),
                    error: None,
                }
            }
            Err(e) => {
                error!(
                    "影片 {} \"{}\" 更新失敗（完成到 {reached:?}）: {e}",
                    video.id,
                    video.path.display()
                );
                PipelineOutcome {
                    state: PipelineState::Failed,
                    reached,
                    frames_directory: None,
                    error: Some(e),
                }
            }
        }
    }

    fn run_steps(
        &self,
        video: &VideoRecord,
        reached: &mut PipelineState,
    ) -> FramesResult<FramesDirectory> {
        let artist = self.store.get_artist_by_id(video.artist_id).map_err(|e| {
            FramesError::Validation(format!("artist of video {} not found: {e:#}", video.id))
        })?;

        let frames_directory = self.create_frames_directory(&artist.name, &video.name)?;
        *reached = PipelineState::DirectoryReady;

        self.extract_frames(&frames_directory, &video.path, self.frame_count)?;
        *reached = PipelineState::FramesReady;

        self.compose_preview(&frames_directory, self.frame_count, self.preview_length)?;
        *reached = PipelineState::PreviewReady;

        let thumbnail = frame_file_name(1);
        self.set_video_frames(
            video.id,
            &frames_directory,
            Some(&thumbnail),
            Some(PREVIEW_FILE),
        )?;
        *reached = PipelineState::Published;

        Ok(frames_directory)
    }
}
