use super::main::VideoFrames;
use crate::store::VideoRecord;
use crate::tools::{FramesDirectory, frames_directory_name};
use indicatif::ProgressBar;
use log::{error, info, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// 批次更新結果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub total_videos: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl VideoFrames {
    /// 平行更新多支影片
    ///
    /// 不同影片各自使用自己的子目錄，可以平行處理；
    /// 對應到同一個子目錄的影片會在同一個工作中依序處理。
    /// 收到中斷信號後尚未開始的影片會被略過。
    pub fn update_all(
        &self,
        videos: &[VideoRecord],
        shutdown_signal: &AtomicBool,
        progress: &ProgressBar,
    ) -> BatchResult {
        let failed = AtomicUsize::new(0);
        let successful = AtomicUsize::new(0);
        let skipped = AtomicUsize::new(0);

        let mut groups: BTreeMap<FramesDirectory, Vec<&VideoRecord>> = BTreeMap::new();
        for video in videos {
            match self.store.get_artist_by_id(video.artist_id) {
                Ok(artist) => groups
                    .entry(frames_directory_name(&artist.name, &video.name))
                    .or_default()
                    .push(video),
                Err(e) => {
                    error!("略過影片 {}: 找不到藝人: {e:#}", video.id);
                    failed.fetch_add(1, Ordering::Relaxed);
                    progress.inc(1);
                }
            }
        }

        for (directory, group) in groups.iter().filter(|(_, g)| g.len() > 1) {
            warn!(
                "{} 支影片共用影格目錄 \"{directory}\"，將依序處理",
                group.len()
            );
        }

        let groups: Vec<Vec<&VideoRecord>> = groups.into_values().collect();
        groups.par_iter().for_each(|group| {
            for video in group {
                if shutdown_signal.load(Ordering::SeqCst) {
                    skipped.fetch_add(1, Ordering::Relaxed);
                    progress.inc(1);
                    continue;
                }

                progress.set_message(video.name.clone());
                if self.update_video_frames(video) {
                    successful.fetch_add(1, Ordering::Relaxed);
                } else {
                    failed.fetch_add(1, Ordering::Relaxed);
                }
                progress.inc(1);
            }
        });

        let result = BatchResult {
            total_videos: videos.len(),
            successful: successful.into_inner(),
            failed: failed.into_inner(),
            skipped: skipped.into_inner(),
        };

        info!(
            "影格更新完成 - 成功: {}, 失敗: {}, 跳過: {}",
            result.successful, result.failed, result.skipped
        );

        result
    }
}
