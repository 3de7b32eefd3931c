use crate::component::VideoFrames;
use crate::component::video_frames::BatchResult;
use crate::pause;
use crate::tools::{FramesDirectory, validate_directory_exists};
use anyhow::Result;
use console::{Term, style};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

fn prompt_video_id() -> Result<u64> {
    let id: u64 = Input::new().with_prompt("請輸入影片 ID").interact_text()?;
    Ok(id)
}

pub fn run_update_all(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    frames: &VideoFrames,
) -> Result<()> {
    println!("{}", style("=== 更新所有影片 ===").cyan().bold());

    let videos = frames.store().get_videos()?;
    if videos.is_empty() {
        println!("{}", style("資料庫中沒有任何影片").yellow());
        pause(term)?;
        return Ok(());
    }

    let progress = ProgressBar::new(videos.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}")?
            .progress_chars("=> "),
    );

    let result = frames.update_all(&videos, shutdown_signal, &progress);
    progress.finish_and_clear();

    print_summary(&result);
    pause(term)?;
    Ok(())
}

pub fn run_update_single(term: &Term, frames: &VideoFrames) -> Result<()> {
    let id = prompt_video_id()?;

    match frames.store().get_video_by_id(id) {
        Ok(video) => {
            println!("{} {}", style("處理中").cyan(), style(&video.name).bold());
            let outcome = frames.run(&video);
            match (&outcome.frames_directory, &outcome.error) {
                (Some(directory), _) => {
                    println!("  {} 已更新: {directory}", style("✓").green());
                }
                (None, Some(e)) => {
                    println!(
                        "  {} 處理失敗（完成到 {:?}）: {e}",
                        style("✗").red(),
                        outcome.reached
                    );
                }
                (None, None) => {}
            }
        }
        Err(e) => eprintln!("{} {}", style("錯誤:").red().bold(), e),
    }

    pause(term)?;
    Ok(())
}

pub fn run_show_status(term: &Term, frames: &VideoFrames) -> Result<()> {
    let id = prompt_video_id()?;

    match frames.store().get_video_by_id(id) {
        Ok(video) => {
            println!("{}", style(format!("{} ({})", video.name, video.path.display())).bold());

            let Some(stored) = &video.frames_directory else {
                println!("  {}", style("尚未建立影格快取").yellow());
                pause(term)?;
                return Ok(());
            };

            let frames_directory = FramesDirectory::from_stored(stored.as_str());
            let (artist_segment, video_segment) = frames_directory.segments();
            println!("  藝人目錄: {artist_segment}");
            println!("  影片目錄: {video_segment}");

            let directory = frames.absolute_path(&frames_directory);
            if let Err(e) = validate_directory_exists(&directory) {
                println!("  {} {e}", style("✗").red());
            }

            for (label, file) in [("縮圖", &video.thumbnail_file), ("預覽", &video.preview_file)] {
                match file {
                    Some(file) if directory.join(file).is_file() => {
                        println!("  {label}: {file} {}", style("✓").green());
                    }
                    Some(file) => println!("  {label}: {file} {}", style("✗ 檔案不存在").red()),
                    None => println!("  {label}: {}", style("未設定").dim()),
                }
            }
        }
        Err(e) => eprintln!("{} {}", style("錯誤:").red().bold(), e),
    }

    pause(term)?;
    Ok(())
}

fn print_summary(result: &BatchResult) {
    println!();
    println!("{}", style("=== 影格更新摘要 ===").cyan().bold());
    println!("  總計: {} 個影片", result.total_videos);
    println!("  成功: {} 個", style(result.successful).green());

    if result.skipped > 0 {
        println!("  跳過: {} 個", style(result.skipped).yellow());
    }

    if result.failed > 0 {
        println!("  失敗: {} 個", style(result.failed).red());
    }
}
