//! 影格快取流程的錯誤類型

use std::path::PathBuf;
use thiserror::Error;

pub type FramesResult<T> = Result<T, FramesError>;

#[derive(Debug, Error)]
pub enum FramesError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("cannot determine duration of {path}: {reason}")]
    MetadataUnavailable { path: PathBuf, reason: String },

    #[error("frame extraction at {timestamp:.3}s from {path} failed: {reason}")]
    ExtractionFailure {
        path: PathBuf,
        timestamp: f64,
        reason: String,
    },

    #[error("not enough frames for a preview animation ({loaded} < 2)")]
    InsufficientFrames { loaded: usize },

    #[error("encoding {path} failed: {reason}")]
    EncodingFailure { path: PathBuf, reason: String },

    #[error("publish precondition failed: {0}")]
    PublishPrecondition(String),

    #[error("record store update for video {video_id} failed: {reason}")]
    StoreUpdate { video_id: u64, reason: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
