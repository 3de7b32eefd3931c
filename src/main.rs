use anyhow::Result;
use console::{Term, style};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use video_frames_cache::component::VideoFrames;
use video_frames_cache::component::video_frames::Engines;
use video_frames_cache::config::{Config, DEFAULT_SETTINGS_FILE};
use video_frames_cache::init;
use video_frames_cache::menu::show_main_menu;
use video_frames_cache::signal::setup_shutdown_signal;
use video_frames_cache::store::JsonVideoStore;

fn main() -> Result<()> {
    init::init();
    let term = Term::stdout();
    let shutdown_signal = setup_shutdown_signal()?;

    let settings_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE), PathBuf::from);
    let config = Config::load(&settings_path)?;

    let store = Arc::new(JsonVideoStore::open(&config.video_frames.store_path)?);
    let engines = Engines::ffmpeg(
        Arc::clone(&shutdown_signal),
        config.video_frames.engine_timeout_secs.map(Duration::from_secs),
    );
    let frames = VideoFrames::new(&config, store, engines)?;

    loop {
        match show_main_menu(&term, &shutdown_signal, &frames) {
            Ok(true) => {}
            Ok(false) => {
                term.clear_screen()?;
                println!("\n{}", style("再見！").green().bold());
                info!("Program exited normally");
                break;
            }
            Err(e) => {
                warn!("Program error: {e}");
                eprintln!("{} {}", style("錯誤:").red().bold(), e);
                break;
            }
        }
    }

    Ok(())
}
