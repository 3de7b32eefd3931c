pub mod load;
pub mod save;
pub mod types;

pub use types::{
    AccessPolicy, Config, DEFAULT_FRAME_COUNT, DEFAULT_PREVIEW_LENGTH, DEFAULT_SETTINGS_FILE,
    MusicSettings, VideoFramesSettings,
};
