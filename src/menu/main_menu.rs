use crate::component::VideoFrames;
use crate::menu::handlers::{run_show_status, run_update_all, run_update_single};
use anyhow::Result;
use console::{Term, style};
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    frames: &VideoFrames,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style("=== 影片影格快取 ===").cyan().bold());
    println!(
        "{}",
        style(format!("快取目錄: {}", frames.frames_root().display())).dim()
    );

    let options = vec![
        "更新所有影片的影格與預覽",
        "更新單一影片",
        "查看影片快取狀態",
        "離開",
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("請選擇功能")
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_update_all(term, shutdown_signal, frames)?;
            Ok(true)
        }
        Some(1) => {
            run_update_single(term, frames)?;
            Ok(true)
        }
        Some(2) => {
            run_show_status(term, frames)?;
            Ok(true)
        }
        Some(3) => Ok(false),
        None => Ok(false), // ESC pressed - exit
        _ => unreachable!(),
    }
}
