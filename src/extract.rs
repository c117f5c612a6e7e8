use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, anyhow, bail};

/// Dumps a video to numbered JPEG frames with ffmpeg.
///
/// Frames land in `output_dir` as `<stem>_%05d.jpg`. With `fps` set the
/// stream is resampled to that rate, otherwise every frame is kept.
pub fn extract_images(video_path: &Path, output_dir: &Path, fps: Option<u32>) -> Result<()> {
    let stem = video_stem(video_path)?;
    let frame_pattern = output_dir.join(format!("{}_%05d.jpg", stem));
    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-y")
        .arg("-i")
        .arg(video_path)
        .args(["-vsync", "0", "-qscale:v", "2"]);
    if let Some(fps) = fps {
        cmd.arg("-vf").arg(format!("fps={}", fps));
    }
    cmd.arg(&frame_pattern);
    log::debug!("running {:?}", cmd);
    let status = cmd
        .status()
        .context("failed to spawn ffmpeg, is it installed?")?;
    if !status.success() {
        bail!("ffmpeg exited with {} for {}", status, video_path.display());
    }
    Ok(())
}

/// Pulls the per-frame telemetry table out of a video with the vendor
/// `vmeta-extract` tool and writes it to `<output_dir>/metadata.csv`.
///
/// Drone SDKs ship the tool behind a `native-wrapper.sh` that sets up the
/// library path; pass it as `native_wrapper` when needed.
pub fn extract_telemetry(
    video_path: &Path,
    output_dir: &Path,
    native_wrapper: Option<&Path>,
) -> Result<PathBuf> {
    let csv_path = output_dir.join("metadata.csv");
    let mut cmd = match native_wrapper {
        Some(wrapper) => {
            let mut c = Command::new(wrapper);
            c.arg("vmeta-extract");
            c
        }
        None => Command::new("vmeta-extract"),
    };
    cmd.arg(video_path).arg("--csv").arg(&csv_path);
    log::debug!("running {:?}", cmd);
    let status = cmd
        .status()
        .context("failed to spawn vmeta-extract, is it installed?")?;
    if !status.success() {
        bail!(
            "vmeta-extract exited with {} for {}",
            status,
            video_path.display()
        );
    }
    Ok(csv_path)
}

/// Queries width, height and frame rate of the first video stream via
/// ffprobe.
pub fn probe_size_and_framerate(video_path: &Path) -> Result<(u32, u32, f64)> {
    let output = Command::new("ffprobe")
        .args([
            "-show_entries",
            "stream=height,width,r_frame_rate",
            "-of",
            "json",
            "-select_streams",
            "v:0",
        ])
        .arg(video_path)
        .output()
        .context("failed to spawn ffprobe, is it installed?")?;
    if !output.status.success() {
        bail!(
            "ffprobe exited with {} for {}",
            output.status,
            video_path.display()
        );
    }
    let probed: serde_json::Value =
        serde_json::from_slice(&output.stdout).context("ffprobe produced invalid json")?;
    let stream = probed["streams"]
        .get(0)
        .ok_or_else(|| anyhow!("no video stream in {}", video_path.display()))?;
    let width = stream["width"]
        .as_u64()
        .ok_or_else(|| anyhow!("ffprobe output misses width"))? as u32;
    let height = stream["height"]
        .as_u64()
        .ok_or_else(|| anyhow!("ffprobe output misses height"))? as u32;
    let rate = stream["r_frame_rate"]
        .as_str()
        .ok_or_else(|| anyhow!("ffprobe output misses r_frame_rate"))?;
    Ok((width, height, frac_to_float(rate)?))
}

/// ffprobe reports frame rates as `30000/1001` style fractions.
pub fn frac_to_float(frac: &str) -> Result<f64> {
    if let Ok(v) = frac.parse::<f64>() {
        return Ok(v);
    }
    let (num, denom) = frac
        .split_once('/')
        .ok_or_else(|| anyhow!("invalid frame rate: {:?}", frac))?;
    let num: f64 = num.parse()?;
    let denom: f64 = denom.parse()?;
    Ok(num / denom)
}

fn video_stem(video_path: &Path) -> Result<&str> {
    video_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("invalid video file name: {}", video_path.display()))
}

/// Finds every `.mp4`/`.MP4` under `root`, sorted for a stable processing
/// order.
pub fn discover_videos(root: &Path) -> Result<Vec<PathBuf>> {
    let mut videos = Vec::new();
    for ext in ["mp4", "MP4"] {
        let pattern = format!("{}/**/*.{}", root.display(), ext);
        for entry in glob::glob(&pattern).context("invalid video glob pattern")? {
            videos.push(entry.context("failed to read video directory entry")?);
        }
    }
    videos.sort();
    // case-insensitive filesystems match both extension spellings
    videos.dedup();
    Ok(videos)
}
