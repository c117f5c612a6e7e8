use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;

use crate::types::{FrameRecord, VideoSequence};

/// Finds every directory under `dataset_dir` that directly contains
/// extracted JPEG frames.
///
/// Results are sorted so that a given dataset always yields the same
/// discovery order, which makes the train/test partition a function of
/// the seed alone.
pub fn discover_video_dirs(dataset_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/**/*.jpg", dataset_dir.display());
    let mut dirs = BTreeSet::new();
    for entry in glob(&pattern).context("invalid dataset glob pattern")? {
        let p = entry.context("failed to read dataset directory entry")?;
        if let Some(parent) = p.parent() {
            dirs.insert(parent.to_path_buf());
        }
    }
    log::info!("found {} video folders under {}", dirs.len(), dataset_dir.display());
    Ok(dirs.into_iter().collect())
}

/// Reads the `metadata.csv` table of one video folder.
///
/// Missing file or malformed rows abort the run; the builder has no use
/// for a video it cannot fully parse.
pub fn load_metadata(video_dir: &Path) -> Result<Vec<FrameRecord>> {
    let csv_path = video_dir.join("metadata.csv");
    let mut reader = csv::Reader::from_path(&csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut frames = Vec::new();
    for row in reader.deserialize() {
        let record: FrameRecord =
            row.with_context(|| format!("malformed row in {}", csv_path.display()))?;
        frames.push(record);
    }
    log::trace!("{}: {} frames", video_dir.display(), frames.len());
    Ok(frames)
}

/// Loads a video folder together with its telemetry rows.
pub fn load_video_sequence(video_dir: &Path) -> Result<VideoSequence> {
    let frames = load_metadata(video_dir)?;
    Ok(VideoSequence {
        path: video_dir.to_path_buf(),
        frames,
    })
}
