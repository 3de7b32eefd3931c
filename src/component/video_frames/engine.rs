//! 外部轉換引擎
//!
//! 流程只透過這些 trait 呼叫 ffprobe/ffmpeg，測試可以換成假的實作。

use super::scale_expander::{ScaleExpander, scaled_path};
use crate::error::FramesError;
use crate::tools::{ProbeError, ProcessError, probe_duration, run_cancellable};
use log::debug;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error("輸出檔案未建立: {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("不支援的格式: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Process(ProcessError::Cancelled { .. })
                | Self::Probe(ProbeError::Process(ProcessError::Cancelled { .. }))
        )
    }

    /// 中斷一律轉成 `Cancelled`，其餘交給 `otherwise`
    pub(crate) fn into_frames_error(
        self,
        otherwise: impl FnOnce(Self) -> FramesError,
    ) -> FramesError {
        if self.is_cancelled() {
            FramesError::Cancelled
        } else {
            otherwise(self)
        }
    }
}

pub trait MetadataProbe: Send + Sync {
    /// 影片總長度（秒）
    fn duration(&self, media_path: &Path) -> Result<f64, EngineError>;
}

pub trait FrameEngine: Send + Sync {
    /// 擷取 `timestamp` 秒處的單一影格
    ///
    /// `aspect_correction` 為 true 時輸出影像需補償 SAR 與 DAR 的差異。
    fn extract_frame(
        &self,
        source: &Path,
        timestamp: f64,
        aspect_correction: bool,
        output: &Path,
    ) -> Result<(), EngineError>;
}

pub trait AnimationEngine: Send + Sync {
    /// 依序組合影格成動畫，每張顯示 `frame_duration_ms` 毫秒
    fn compose_animation(
        &self,
        frames: &[PathBuf],
        frame_duration_ms: u64,
        loop_forever: bool,
        output: &Path,
    ) -> Result<(), EngineError>;
}

/// 流程使用的所有外部引擎
#[derive(Clone)]
pub struct Engines {
    pub probe: Arc<dyn MetadataProbe>,
    pub frames: Arc<dyn FrameEngine>,
    pub animation: Arc<dyn AnimationEngine>,
    pub scaler: Arc<dyn ScaleExpander>,
}

impl Engines {
    #[must_use]
    pub fn ffmpeg(shutdown_signal: Arc<AtomicBool>, timeout: Option<Duration>) -> Self {
        let engine = Arc::new(FfmpegEngine::new(shutdown_signal, timeout));
        Self {
            probe: engine.clone(),
            frames: engine.clone(),
            animation: engine.clone(),
            scaler: engine,
        }
    }
}

/// 以 ffprobe/ffmpeg 子程序實作的引擎
///
/// 每次呼叫都可被中斷信號或逾時終止。
pub struct FfmpegEngine {
    shutdown_signal: Arc<AtomicBool>,
    timeout: Option<Duration>,
}

impl FfmpegEngine {
    #[must_use]
    pub const fn new(shutdown_signal: Arc<AtomicBool>, timeout: Option<Duration>) -> Self {
        Self {
            shutdown_signal,
            timeout,
        }
    }

    fn ffmpeg() -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error"]);
        cmd
    }

    fn run(&self, command: Command) -> Result<(), EngineError> {
        run_cancellable(command, &self.shutdown_signal, self.timeout)?;
        Ok(())
    }

    /// 寫到同目錄的暫存檔，成功後 rename 取代目標檔案
    fn write_replacing(
        &self,
        output: &Path,
        build: impl FnOnce(&Path) -> Command,
    ) -> Result<(), EngineError> {
        let file_name = output
            .file_name()
            .map_or_else(|| "output".to_string(), |n| n.to_string_lossy().to_string());
        let temp_path = output.with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));

        let result = self.run(build(&temp_path)).and_then(|()| {
            if temp_path.is_file() {
                fs::rename(&temp_path, output)?;
                Ok(())
            } else {
                Err(EngineError::MissingOutput(output.to_path_buf()))
            }
        });

        if result.is_err() && temp_path.exists() {
            let _ = fs::remove_file(&temp_path);
        }

        result
    }
}

/// concat demuxer 清單；最後一張需重複列出，否則它的 duration 會被忽略
fn build_concat_list(frames: &[PathBuf], frame_duration_ms: u64) -> String {
    let seconds = frame_duration_ms as f64 / 1000.0;
    let mut list = String::from("ffconcat version 1.0\n");

    for frame in frames {
        let _ = writeln!(list, "file '{}'", escape_concat_path(frame));
        let _ = writeln!(list, "duration {seconds:.3}");
    }
    if let Some(last) = frames.last() {
        let _ = writeln!(list, "file '{}'", escape_concat_path(last));
    }

    list
}

const JPEG_OUTPUT_ARGS: [&str; 8] = ["-c:v", "mjpeg", "-q:v", "2", "-f", "image2", "-update", "1"];

fn escape_concat_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', "'\\''")
}

fn image_codec_args(path: &Path) -> Result<&'static [&'static str], EngineError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => Ok(&JPEG_OUTPUT_ARGS),
        "png" => Ok(&["-c:v", "png", "-f", "image2", "-update", "1"]),
        // ffmpeg 無法解碼 WebP 動畫
        other => Err(EngineError::Unsupported(format!(
            "無法縮放 .{other} 檔案: {}",
            path.display()
        ))),
    }
}

impl MetadataProbe for FfmpegEngine {
    fn duration(&self, media_path: &Path) -> Result<f64, EngineError> {
        Ok(probe_duration(
            media_path,
            &self.shutdown_signal,
            self.timeout,
        )?)
    }
}

impl FrameEngine for FfmpegEngine {
    fn extract_frame(
        &self,
        source: &Path,
        timestamp: f64,
        aspect_correction: bool,
        output: &Path,
    ) -> Result<(), EngineError> {
        debug!(
            "擷取影格 {:.3}s: {} -> {}",
            timestamp,
            source.display(),
            output.display()
        );

        self.write_replacing(output, |temp| {
            let mut cmd = Self::ffmpeg();
            cmd.args(["-ss", &format!("{timestamp:.3}"), "-i"]).arg(source);
            if aspect_correction {
                // 以 SAR 修正寬度，輸出比例與播放器顯示一致
                cmd.args(["-vf", "scale=iw*sar:ih"]);
            }
            cmd.args(["-frames:v", "1", "-an", "-sn", "-dn"])
                .args(JPEG_OUTPUT_ARGS)
                .arg("-y")
                .arg(temp);
            cmd
        })
    }
}

impl AnimationEngine for FfmpegEngine {
    fn compose_animation(
        &self,
        frames: &[PathBuf],
        frame_duration_ms: u64,
        loop_forever: bool,
        output: &Path,
    ) -> Result<(), EngineError> {
        let list_path =
            std::env::temp_dir().join(format!("frames-concat-{}.txt", uuid::Uuid::new_v4()));
        fs::write(&list_path, build_concat_list(frames, frame_duration_ms))?;

        debug!(
            "合成預覽動畫 {} 張影格, 每張 {}ms: {}",
            frames.len(),
            frame_duration_ms,
            output.display()
        );

        let result = self.write_replacing(output, |temp| {
            let mut cmd = Self::ffmpeg();
            cmd.args(["-f", "concat", "-safe", "0", "-i"])
                .arg(&list_path)
                .args([
                    "-an",
                    "-vsync",
                    "vfr",
                    "-c:v",
                    "libwebp",
                    "-lossless",
                    "0",
                    "-quality",
                    "80",
                    // 最慢但品質最好的壓縮方式
                    "-compression_level",
                    "6",
                    "-loop",
                    if loop_forever { "0" } else { "1" },
                    "-f",
                    "webp",
                    "-y",
                ])
                .arg(temp);
            cmd
        });

        let _ = fs::remove_file(&list_path);
        result
    }
}

impl ScaleExpander for FfmpegEngine {
    fn expand_scales(&self, base: &Path, edges: &[u32]) -> Result<Vec<PathBuf>, EngineError> {
        let mut scaled = Vec::with_capacity(edges.len());

        for &edge in edges {
            let codec_args = image_codec_args(base)?;
            let output = scaled_path(base, edge);

            self.write_replacing(&output, |temp| {
                let mut cmd = Self::ffmpeg();
                cmd.arg("-i")
                    .arg(base)
                    // 寬度固定為 edge，高度依原比例（取偶數）
                    .args(["-vf", &format!("scale={edge}:-2"), "-frames:v", "1"])
                    .args(codec_args)
                    .arg("-y")
                    .arg(temp);
                cmd
            })?;

            scaled.push(output);
        }

        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_list_repeats_last_frame() {
        let frames = vec![
            PathBuf::from("/cache/Rammstein/Sonne/frame-01.jpg"),
            PathBuf::from("/cache/Rammstein/Sonne/frame-02.jpg"),
        ];
        let list = build_concat_list(&frames, 600);

        assert_eq!(
            list,
            "ffconcat version 1.0\n\
             file '/cache/Rammstein/Sonne/frame-01.jpg'\n\
             duration 0.600\n\
             file '/cache/Rammstein/Sonne/frame-02.jpg'\n\
             duration 0.600\n\
             file '/cache/Rammstein/Sonne/frame-02.jpg'\n"
        );
    }

    #[test]
    fn test_concat_path_escapes_quotes() {
        let path = PathBuf::from("/cache/Guns N' Roses/Don't Cry/frame-01.jpg");
        assert_eq!(
            escape_concat_path(&path),
            "/cache/Guns N'\\'' Roses/Don'\\''t Cry/frame-01.jpg"
        );
    }

    #[test]
    fn test_image_codec_args() {
        assert!(image_codec_args(Path::new("frame-01.jpg")).is_ok());
        assert!(image_codec_args(Path::new("FRAME-01.JPG")).is_ok());
        assert!(matches!(
            image_codec_args(Path::new("preview.webp")),
            Err(EngineError::Unsupported(_))
        ));
    }

    #[test]
    fn test_cancelled_detection() {
        let cancelled = EngineError::Process(ProcessError::Cancelled {
            program: "ffmpeg".to_string(),
        });
        assert!(cancelled.is_cancelled());
        assert!(!EngineError::Unsupported("x".to_string()).is_cancelled());
    }
}
