use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One row of the vendor telemetry CSV written by `vmeta-extract`.
///
/// The table is space-delimited and indexed by the frame capture time in
/// microseconds. Only the GPS fields are needed here.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryRow {
    #[serde(rename = "time")]
    pub time_us: i64,
    pub location_valid: u8,
    pub location_latitude: f64,
    pub location_longitude: f64,
    pub location_altitude: f64,
}

impl TelemetryRow {
    pub fn has_location(&self) -> bool {
        self.location_valid == 1
    }
}

/// Reads the space-delimited telemetry table produced by `vmeta-extract`.
pub fn load_telemetry(csv_path: &Path) -> Result<Vec<TelemetryRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b' ')
        .from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        let record: TelemetryRow =
            row.with_context(|| format!("malformed row in {}", csv_path.display()))?;
        rows.push(record);
    }
    Ok(rows)
}

/// Downsamples telemetry rows to one per frame period of the target
/// frame rate.
///
/// Rows are bucketed by `floor(time * fps / 1e6)` and the first row of
/// each bucket wins, matching how the frames themselves were resampled
/// during extraction. Rows must be in time order.
pub fn resample_to_fps(rows: Vec<TelemetryRow>, fps: u32) -> Vec<TelemetryRow> {
    let mut resampled: Vec<TelemetryRow> = Vec::new();
    let mut last_bucket = None;
    for row in rows {
        let bucket = row.time_us * fps as i64 / 1_000_000;
        if last_bucket != Some(bucket) {
            last_bucket = Some(bucket);
            resampled.push(row);
        }
    }
    resampled
}
