use crate::config::save::save_settings;
use crate::config::types::Config;
use crate::error::FramesError;
use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::Path;

impl Config {
    /// Load settings from `path`.
    ///
    /// A missing file is written out with defaults so the operator has a
    /// template to edit, and loading fails with a configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            save_settings(&config, path)?;
            warn!("設定檔 {} 不存在，已寫入預設值", path.display());
            return Err(FramesError::Configuration(format!(
                "settings file {} was missing; a default one has been created",
                path.display()
            ))
            .into());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        config.validate()?;
        info!("已載入設定檔 {}", path.display());
        Ok(config)
    }

    /// 檢查所有必須存在的路徑
    pub fn validate(&self) -> Result<(), FramesError> {
        for root in [&self.music.path, &self.video_frames.path] {
            if !root.is_dir() {
                return Err(FramesError::Configuration(format!(
                    "path \"{}\" does not exist",
                    root.display()
                )));
            }
        }

        if self.video_frames.frames == 0 {
            return Err(FramesError::Configuration(
                "videoframes.frames must be at least 1".to_string(),
            ));
        }

        // ffmpeg 的 scale=0 代表保留原寬度
        if self.video_frames.scales.contains(&0) {
            return Err(FramesError::Configuration(
                "videoframes.scales must not contain 0".to_string(),
            ));
        }

        Ok(())
    }
}
