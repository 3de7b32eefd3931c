use crate::tools::process_runner::{ProcessError, run_cancellable};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("無法解析 ffprobe 輸出: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("無法取得影片長度")]
    MissingDuration,
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    duration: Option<String>,
}

/// 使用 ffprobe 取得影片總長度（秒）
pub fn probe_duration(
    path: &Path,
    shutdown_signal: &AtomicBool,
    timeout: Option<Duration>,
) -> Result<f64, ProbeError> {
    let mut command = Command::new("ffprobe");
    command
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path);

    let stdout = run_cancellable(command, shutdown_signal, timeout)?;
    parse_duration(&stdout)
}

/// 影片長度優先從 format 取得，其次從視訊串流
fn parse_duration(json: &str) -> Result<f64, ProbeError> {
    let probe: FfprobeOutput = serde_json::from_str(json)?;

    let stream_duration = probe.streams.as_ref().and_then(|streams| {
        streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .and_then(|s| s.duration.as_ref())
    });

    probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .or(stream_duration)
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or(ProbeError::MissingDuration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_from_format() {
        let json = r#"{"format": {"duration": "215.360000"}, "streams": []}"#;
        assert!((parse_duration(json).unwrap() - 215.36).abs() < 1e-6);
    }

    #[test]
    fn test_parse_duration_falls_back_to_video_stream() {
        let json = r#"{
            "format": {},
            "streams": [
                {"codec_type": "audio", "duration": "99.0"},
                {"codec_type": "video", "duration": "42.5"}
            ]
        }"#;
        assert!((parse_duration(json).unwrap() - 42.5).abs() < 1e-6);
    }

    #[test]
    fn test_parse_duration_missing() {
        assert!(matches!(
            parse_duration(r#"{"streams": []}"#),
            Err(ProbeError::MissingDuration)
        ));
        assert!(matches!(
            parse_duration(r#"{"format": {"duration": "N/A"}}"#),
            Err(ProbeError::MissingDuration)
        ));
        assert!(matches!(parse_duration("not json"), Err(ProbeError::Parse(_))));
    }
}
