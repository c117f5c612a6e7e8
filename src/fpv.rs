use nalgebra as na;

use crate::types::FrameRecord;

/// Largest shift window used for displacement smoothing.
pub const MAX_SHIFT: usize = 3;

/// Computes the smoothed displacement vector for every frame of one
/// segment.
///
/// For each shift `j = 1..MAX_SHIFT` the backward difference
/// `(t[i] - t[i-j]) / j` is accumulated over the three translation
/// components. Frames with fewer than `MAX_SHIFT - 1` predecessors have
/// no full window and come out as NaN; the caller trims them away with
/// `min_shift` or passes them through knowingly.
pub fn smoothed_displacements(translations: &[na::Vector3<f64>]) -> Vec<na::Vector3<f64>> {
    (0..translations.len())
        .map(|i| {
            let mut acc = na::Vector3::zeros();
            for j in 1..MAX_SHIFT {
                if i < j {
                    acc += na::Vector3::repeat(f64::NAN);
                } else {
                    acc += (translations[i] - translations[i - j]) / j as f64;
                }
            }
            acc
        })
        .collect()
}

/// Projects a displacement vector to pixel coordinates under the pinhole
/// model of the frame's intrinsics.
///
/// This approximates the vanishing point of forward motion. When the
/// forward component is near zero the division blows up and the result is
/// non-finite; the value is returned as-is and accounted for by the
/// builder, never silently fixed up.
pub fn project_fpv(displacement: &na::Vector3<f64>, frame: &FrameRecord) -> (f64, f64) {
    let (dx, dy, dz) = (displacement.x, displacement.y, displacement.z);
    let fpv_x = frame.fx * dx / dz + frame.cx;
    let fpv_y = frame.fy * dy / dz + frame.cy;
    (fpv_x, fpv_y)
}

/// FPV targets for a whole segment, in frame order.
pub fn fpv_targets(segment: &[FrameRecord]) -> Vec<(f64, f64)> {
    let translations: Vec<na::Vector3<f64>> = segment.iter().map(|f| f.translation()).collect();
    smoothed_displacements(&translations)
        .iter()
        .zip(segment)
        .map(|(d, f)| project_fpv(d, f))
        .collect()
}
