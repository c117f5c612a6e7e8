use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};

/// Embeds a GPS position into an image's EXIF tags in place.
///
/// Tag writing is delegated to the external `exiftool` binary. Latitude
/// and longitude references follow the coordinate signs; the altitude
/// reference flips to below-sea-level for negative altitudes.
pub fn set_gps_location(image_path: &Path, lat: f64, lon: f64, alt: f64) -> Result<()> {
    let lat_ref = if lat >= 0.0 { "N" } else { "S" };
    let lon_ref = if lon >= 0.0 { "E" } else { "W" };
    let alt_ref = if alt >= 0.0 { "0" } else { "1" };
    let status = Command::new("exiftool")
        .arg("-overwrite_original")
        .arg(format!("-GPSLatitude={}", lat.abs()))
        .arg(format!("-GPSLatitudeRef={}", lat_ref))
        .arg(format!("-GPSLongitude={}", lon.abs()))
        .arg(format!("-GPSLongitudeRef={}", lon_ref))
        .arg(format!("-GPSAltitude={}", alt.abs()))
        .arg(format!("-GPSAltitudeRef={}", alt_ref))
        .arg(image_path)
        .status()
        .context("failed to spawn exiftool, is it installed?")?;
    if !status.success() {
        bail!("exiftool exited with {} for {}", status, image_path.display());
    }
    Ok(())
}
