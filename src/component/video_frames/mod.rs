//! 影片影格快取元件
//!
//! 四階段流程：
//! A. 建立影格子目錄
//! B. 依影片長度均勻擷取影格（ffmpeg）
//! C. 合成 WebP 預覽動畫
//! D. 確認檔案存在後更新影片資料庫

mod batch;
mod directory;
mod engine;
mod frame_extractor;
mod main;
mod preview_composer;
mod publisher;
mod scale_expander;

pub use batch::BatchResult;
pub use engine::{AnimationEngine, EngineError, Engines, FfmpegEngine, FrameEngine, MetadataProbe};
pub use frame_extractor::frame_file_name;
pub use main::{PipelineOutcome, PipelineState, VideoFrames};
pub use preview_composer::{PREVIEW_FILE, frame_duration_ms};
pub use scale_expander::{NoScaling, ScaleExpander, scaled_file_name, scaled_path};
