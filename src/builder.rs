use std::path::Path;

use anyhow::{Result, bail};
use indicatif::ProgressIterator;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::data_loader::{discover_video_dirs, load_metadata};
use crate::fpv::fpv_targets;
use crate::sampling::{sample_bounded, split_videos};
use crate::segment::{retained_segments, validity_mask};
use crate::io;
use crate::types::{FrameRecord, PooledFrame};

pub struct BuilderConfig {
    pub split: f64,
    pub seed: u64,
    pub max_num_samples: usize,
    pub min_shift: usize,
    pub allow_interpolated_frames: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            split: 0.0,
            seed: 0,
            max_num_samples: 500,
            min_shift: 0,
            allow_interpolated_frames: false,
        }
    }
}

pub struct BuildSummary {
    pub num_train_videos: usize,
    pub num_eval_videos: usize,
    pub pool_size: usize,
    pub num_written: usize,
}

/// Collects the sampleable frames of one video.
///
/// Each retained validity segment contributes its rows after the first
/// `min_shift` (no full displacement history), minus anything still
/// flagged interpolated. Interpolated frames never reach the pool even
/// when they were allowed to extend segments.
pub fn pool_video_frames(
    frames: &[FrameRecord],
    min_shift: usize,
    allow_interpolated: bool,
) -> Vec<PooledFrame> {
    let mask = validity_mask(frames, allow_interpolated);
    let mut pooled = Vec::new();
    for (start, end) in retained_segments(&mask, min_shift) {
        let segment = &frames[start..end];
        let targets = fpv_targets(segment);
        for (frame, &(fpv_x, fpv_y)) in segment.iter().zip(&targets).skip(min_shift) {
            if frame.interpolated {
                continue;
            }
            pooled.push(PooledFrame {
                image_path: frame.image_path.clone(),
                fpv_x,
                fpv_y,
            });
        }
    }
    pooled
}

/// Runs the full metadata-and-sampling pass over `dataset_dir` and writes
/// `test_files.txt`, `fpv.txt` and (when a split is requested)
/// `train_folders.txt` into it.
pub fn run(dataset_dir: &Path, config: &BuilderConfig) -> Result<BuildSummary> {
    let video_dirs = discover_video_dirs(dataset_dir)?;
    let mut shuffle_rng = ChaCha8Rng::seed_from_u64(config.seed);
    let (train_dirs, eval_dirs) = split_videos(video_dirs, config.split, &mut shuffle_rng);
    log::info!(
        "{} training videos, {} evaluation videos",
        train_dirs.len(),
        eval_dirs.len()
    );

    let mut pool = Vec::new();
    for video_dir in eval_dirs.iter().progress_count(eval_dirs.len() as u64) {
        let frames = load_metadata(video_dir)?;
        let pooled = pool_video_frames(&frames, config.min_shift, config.allow_interpolated_frames);
        let non_finite = pooled.iter().filter(|f| !f.is_finite()).count();
        if non_finite > 0 {
            log::warn!(
                "{}: {} of {} frames have a non-finite FPV target (no forward motion \
                 or too little history), kept as-is",
                video_dir.display(),
                non_finite,
                pooled.len()
            );
        }
        pool.extend(pooled);
    }
    if pool.is_empty() {
        bail!("no valid frames found in {}", dataset_dir.display());
    }
    let pool_size = pool.len();

    // Fresh generator so sampling sees the seed, not whatever state the
    // shuffle left behind.
    let mut sample_rng = ChaCha8Rng::seed_from_u64(config.seed);
    let selected = sample_bounded(pool, config.max_num_samples, &mut sample_rng);

    io::write_image_list(&dataset_dir.join("test_files.txt"), &selected)?;
    io::write_fpv_table(&dataset_dir.join("fpv.txt"), &selected)?;
    if !train_dirs.is_empty() {
        io::write_train_folders(&dataset_dir.join("train_folders.txt"), &train_dirs)?;
    }

    Ok(BuildSummary {
        num_train_videos: train_dirs.len(),
        num_eval_videos: eval_dirs.len(),
        pool_size,
        num_written: selected.len(),
    })
}
