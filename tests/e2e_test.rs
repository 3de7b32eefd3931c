//! E2E Integration Tests
//!
//! 使用真正的 ffmpeg/ffprobe 產生影格與預覽動畫。
//! 系統沒有 ffmpeg 或 libwebp 編碼器時跳過。

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use tempfile::TempDir;

use video_frames_cache::component::video_frames::{
    Engines, FfmpegEngine, MetadataProbe, PipelineState, VideoFrames,
};
use video_frames_cache::config::Config;
use video_frames_cache::error::FramesError;
use video_frames_cache::store::{ArtistRecord, JsonVideoStore, VideoRecord, VideoStore};

fn ffmpeg_available() -> bool {
    let probe_ok = Command::new("ffprobe")
        .arg("-version")
        .output()
        .is_ok_and(|o| o.status.success());
    let encoders = Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .output();

    probe_ok
        && encoders.is_ok_and(|o| {
            o.status.success() && String::from_utf8_lossy(&o.stdout).contains("libwebp")
        })
}

/// 以 lavfi 測試來源產生一支短片
fn make_test_video(path: &Path, seconds: u32) -> bool {
    Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-y", "-f", "lavfi", "-i"])
        .arg(format!("testsrc=duration={seconds}:size=320x240:rate=10"))
        .args(["-pix_fmt", "yuv420p"])
        .arg(path)
        .status()
        .is_ok_and(|s| s.success())
}

struct Library {
    _temp: TempDir,
    config: Config,
    store: Arc<JsonVideoStore>,
}

fn setup(video_name: &str, seconds: u32) -> Option<Library> {
    if !ffmpeg_available() {
        println!("跳過測試：找不到 ffmpeg/ffprobe 或 libwebp 編碼器");
        return None;
    }

    let temp = TempDir::new().unwrap();
    let music = temp.path().join("music");
    let frames = temp.path().join("videoframes");
    fs::create_dir_all(music.join("Rammstein")).unwrap();
    fs::create_dir_all(&frames).unwrap();

    let relative = PathBuf::from("Rammstein").join(format!("{video_name}.mp4"));
    if !make_test_video(&music.join(&relative), seconds) {
        println!("跳過測試：無法產生測試影片");
        return None;
    }

    let mut config = Config::default();
    config.music.path = music;
    config.video_frames.path = frames;
    config.video_frames.scales = vec![50];
    config.video_frames.store_path = temp.path().join("videos.json");

    let store = Arc::new(JsonVideoStore::open(&config.video_frames.store_path).unwrap());
    store
        .insert(
            vec![ArtistRecord {
                id: 1,
                name: "Rammstein".to_string(),
            }],
            vec![VideoRecord {
                id: 1000,
                artist_id: 1,
                name: video_name.to_string(),
                path: relative,
                frames_directory: None,
                thumbnail_file: None,
                preview_file: None,
            }],
        )
        .unwrap();

    Some(Library {
        _temp: temp,
        config,
        store,
    })
}

#[test]
fn test_ffmpeg_pipeline_e2e() {
    let Some(library) = setup("Sonne", 6) else {
        return;
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    let engines = Engines::ffmpeg(shutdown, Some(Duration::from_secs(60)));
    let frames = VideoFrames::new(&library.config, library.store.clone(), engines).unwrap();

    let video = library.store.get_video_by_id(1000).unwrap();
    let outcome = frames.run(&video);
    assert_eq!(outcome.state, PipelineState::Published, "{:?}", outcome.error);

    let directory = library.config.video_frames.path.join("Rammstein/Sonne");
    for number in 1..=5 {
        let frame = directory.join(format!("frame-{number:02}.jpg"));
        let bytes = fs::read(&frame).unwrap();
        // JPEG SOI
        assert_eq!(&bytes[..2], &[0xFF, 0xD8], "{}", frame.display());
        assert!(directory.join(format!("frame-{number:02} (50×50).jpg")).is_file());
    }

    let preview = fs::read(directory.join("preview.webp")).unwrap();
    assert_eq!(&preview[..4], b"RIFF");
    assert_eq!(&preview[8..12], b"WEBP");

    // 不留下暫存檔
    let leftovers: Vec<_> = fs::read_dir(&directory)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());

    let record = library.store.get_video_by_id(1000).unwrap();
    assert_eq!(record.frames_directory.as_deref(), Some("Rammstein/Sonne"));
    assert_eq!(record.thumbnail_file.as_deref(), Some("frame-01.jpg"));
    assert_eq!(record.preview_file.as_deref(), Some("preview.webp"));
}

#[test]
fn test_ffprobe_duration_e2e() {
    let Some(library) = setup("Mutter", 4) else {
        return;
    };

    let engine = FfmpegEngine::new(Arc::new(AtomicBool::new(false)), None);
    let source = library.config.music.path.join("Rammstein/Mutter.mp4");
    let duration = engine.duration(&source).unwrap();
    assert!((duration - 4.0).abs() < 0.5, "duration was {duration}");
}

#[test]
fn test_corrupt_video_fails_before_extraction() {
    let Some(library) = setup("Links", 2) else {
        return;
    };

    let source = library.config.music.path.join("Rammstein/Links.mp4");
    fs::write(&source, b"definitely not a video").unwrap();

    let engines = Engines::ffmpeg(Arc::new(AtomicBool::new(false)), None);
    let frames = VideoFrames::new(&library.config, library.store.clone(), engines).unwrap();
    let outcome = frames.run(&library.store.get_video_by_id(1000).unwrap());

    assert_eq!(outcome.reached, PipelineState::DirectoryReady);
    assert!(matches!(
        outcome.error,
        Some(FramesError::MetadataUnavailable { .. })
    ));
    assert!(
        library
            .store
            .get_video_by_id(1000)
            .unwrap()
            .frames_directory
            .is_none()
    );
}

#[test]
fn test_cancelled_before_start_e2e() {
    let Some(library) = setup("Feuer", 2) else {
        return;
    };

    let engines = Engines::ffmpeg(Arc::new(AtomicBool::new(true)), None);
    let frames = VideoFrames::new(&library.config, library.store.clone(), engines).unwrap();
    let outcome = frames.run(&library.store.get_video_by_id(1000).unwrap());

    assert!(matches!(outcome.error, Some(FramesError::Cancelled)));
}
