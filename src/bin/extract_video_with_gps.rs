use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::ProgressIterator;

use drone_dataset_prep::exif::set_gps_location;
use drone_dataset_prep::extract::{
    discover_videos, extract_images, extract_telemetry, probe_size_and_framerate,
};
use drone_dataset_prep::telemetry::{load_telemetry, resample_to_fps};

/// Extract frames and GPS-tagged telemetry from drone videos.
#[derive(Parser)]
#[command(version, about, author)]
struct Cli {
    /// path to video folder root, or a single video file
    #[arg(long, value_name = "DIR")]
    root: PathBuf,

    /// target frame rate, extracts every frame when unset
    #[arg(long, value_name = "F")]
    fps: Option<u32>,

    /// native-wrapper.sh file location for vmeta-extract
    #[arg(long)]
    nw: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let videos = if cli.root.is_dir() {
        discover_videos(&cli.root)?
    } else if cli.root.is_file() {
        vec![cli.root.clone()]
    } else {
        bail!("{} is neither a folder nor a video file", cli.root.display());
    };
    if videos.is_empty() {
        bail!("no videos found under {}", cli.root.display());
    }
    log::info!("processing {} videos", videos.len());

    for video in &videos {
        process_video(video, cli.fps, cli.nw.as_deref())?;
    }
    Ok(())
}

/// One video end to end: frames out, telemetry out, GPS tags in.
fn process_video(video_path: &Path, fps: Option<u32>, native_wrapper: Option<&Path>) -> Result<()> {
    let stem = video_path
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("invalid video file name: {}", video_path.display()))?;
    let output_dir = video_path
        .parent()
        .with_context(|| format!("no parent folder for {}", video_path.display()))?
        .join(stem);
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let (width, height, native_fps) = probe_size_and_framerate(video_path)?;
    log::info!(
        "{}: {}x{} @ {:.2} fps",
        video_path.display(),
        width,
        height,
        native_fps
    );

    extract_images(video_path, &output_dir, fps)?;
    let csv_path = extract_telemetry(video_path, &output_dir, native_wrapper)?;
    add_gps_to_exif(&output_dir, &csv_path, fps)?;
    Ok(())
}

/// Pairs telemetry rows with the extracted frames and embeds GPS tags
/// wherever the drone had a fix. Helps colmap seed its reconstruction.
fn add_gps_to_exif(frames_dir: &Path, csv_path: &Path, fps: Option<u32>) -> Result<()> {
    let mut rows = load_telemetry(csv_path)?;
    if let Some(fps) = fps {
        rows = resample_to_fps(rows, fps);
    }

    let pattern = format!("{}/*.jpg", frames_dir.display());
    let mut pictures = Vec::new();
    for entry in glob::glob(&pattern).context("invalid frame glob pattern")? {
        pictures.push(entry.context("failed to read frame directory entry")?);
    }
    pictures.sort();

    let n = pictures.len().min(rows.len());
    if pictures.len() != rows.len() {
        log::warn!(
            "{}: {} frames but {} telemetry rows, tagging the first {}",
            frames_dir.display(),
            pictures.len(),
            rows.len(),
            n
        );
    }
    for (picture, row) in pictures
        .iter()
        .zip(&rows)
        .progress_count(n as u64)
    {
        if row.has_location() {
            set_gps_location(
                picture,
                row.location_latitude,
                row.location_longitude,
                row.location_altitude,
            )?;
        }
    }
    Ok(())
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
