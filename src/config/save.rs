use crate::config::types::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn save_settings(config: &Config, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config).context("Failed to serialize settings")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;

    Ok(())
}
