use nalgebra as na;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

/// One row of a video folder's `metadata.csv`.
///
/// Extra columns (full pose matrix, GPS, timestamps) are ignored; only the
/// fields needed to derive the FPV target are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameRecord {
    pub image_path: String,
    #[serde(deserialize_with = "bool_from_field")]
    pub registered: bool,
    #[serde(deserialize_with = "bool_from_field")]
    pub interpolated: bool,
    pub pose03: f64,
    pub pose13: f64,
    pub pose23: f64,
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl FrameRecord {
    /// Translation part of the flattened 3x4 camera pose.
    pub fn translation(&self) -> na::Vector3<f64> {
        na::Vector3::new(self.pose03, self.pose13, self.pose23)
    }
}

/// A frame retained for the evaluation manifests, with its derived
/// FPV target in pixel coordinates.
#[derive(Debug, Clone)]
pub struct PooledFrame {
    pub image_path: String,
    pub fpv_x: f64,
    pub fpv_y: f64,
}

impl PooledFrame {
    pub fn is_finite(&self) -> bool {
        self.fpv_x.is_finite() && self.fpv_y.is_finite()
    }
}

/// A directory holding extracted JPEG frames and their telemetry table.
#[derive(Debug, Clone)]
pub struct VideoSequence {
    pub path: PathBuf,
    pub frames: Vec<FrameRecord>,
}

/// Boolean columns come out of different exporters as `0`/`1` or
/// `True`/`False`; accept both spellings.
fn bool_from_field<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.trim() {
        "1" | "true" | "True" | "TRUE" => Ok(true),
        "0" | "false" | "False" | "FALSE" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "invalid boolean value: {:?}",
            other
        ))),
    }
}
