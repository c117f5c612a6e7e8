use std::fs;
use std::path::Path;

use drone_dataset_prep::builder::{BuilderConfig, pool_video_frames, run};
use drone_dataset_prep::types::FrameRecord;
use tempfile::TempDir;

fn make_frame(idx: usize, registered: bool, interpolated: bool) -> FrameRecord {
    FrameRecord {
        image_path: format!("img_{:05}.jpg", idx),
        registered,
        interpolated,
        pose03: 0.1 * idx as f64,
        pose13: 0.0,
        pose23: 0.5 * idx as f64,
        fx: 1000.0,
        fy: 1000.0,
        cx: 320.0,
        cy: 240.0,
    }
}

/// Writes a video folder with dummy frames and a metadata.csv with
/// forward motion along +z.
fn write_video_dir(root: &Path, name: &str, flags: &[(bool, bool)]) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    let mut csv = String::from(
        "image_path,registered,interpolated,pose03,pose13,pose23,fx,fy,cx,cy\n",
    );
    for (i, &(registered, interpolated)) in flags.iter().enumerate() {
        let image_name = format!("img_{:05}.jpg", i);
        fs::write(dir.join(&image_name), b"jpg").unwrap();
        csv += &format!(
            "{},{},{},{},{},{},1000.0,1000.0,320.0,240.0\n",
            image_name,
            registered as u8,
            interpolated as u8,
            0.1 * i as f64,
            0.0,
            0.5 * i as f64,
        );
    }
    fs::write(dir.join("metadata.csv"), csv).unwrap();
}

#[test]
fn test_pool_contribution_per_segment() {
    // validity 0,1,1,1,0,1,1 with min_shift=1:
    // both segments survive and contribute length-1 rows each
    let flags = [false, true, true, true, false, true, true];
    let frames: Vec<_> = flags
        .iter()
        .enumerate()
        .map(|(i, &r)| make_frame(i, r, false))
        .collect();
    let pooled = pool_video_frames(&frames, 1, false);
    assert_eq!(pooled.len(), (3 - 1) + (2 - 1));
    let paths: Vec<_> = pooled.iter().map(|f| f.image_path.as_str()).collect();
    assert_eq!(paths, vec!["img_00002.jpg", "img_00003.jpg", "img_00006.jpg"]);
}

#[test]
fn test_pool_short_segment_contributes_nothing() {
    let flags = [false, true, true, false];
    let frames: Vec<_> = flags
        .iter()
        .enumerate()
        .map(|(i, &r)| make_frame(i, r, false))
        .collect();
    assert!(pool_video_frames(&frames, 2, false).is_empty());
}

#[test]
fn test_pool_interpolated_frames_never_sampled() {
    // Frames 4 and 5 interpolated in an otherwise valid video
    let frames: Vec<_> = (0..10)
        .map(|i| make_frame(i, true, i == 4 || i == 5))
        .collect();

    // Disallowed: they split the video into two segments
    let strict = pool_video_frames(&frames, 0, false);
    assert_eq!(strict.len(), 8);
    assert!(strict.iter().all(|f| f.image_path != "img_00004.jpg"));

    // Allowed: one long segment, but the rows themselves still dropped
    let bridged = pool_video_frames(&frames, 0, true);
    assert_eq!(bridged.len(), 8);
    assert!(bridged.iter().all(|f| f.image_path != "img_00005.jpg"));
}

#[test]
fn test_run_writes_aligned_manifests() {
    let tmp = TempDir::new().unwrap();
    write_video_dir(tmp.path(), "vid_a", &[(true, false); 10]);

    let config = BuilderConfig {
        min_shift: 2,
        ..Default::default()
    };
    let summary = run(tmp.path(), &config).unwrap();
    assert_eq!(summary.num_eval_videos, 1);
    assert_eq!(summary.pool_size, 8);
    assert_eq!(summary.num_written, 8);

    let images = fs::read_to_string(tmp.path().join("test_files.txt")).unwrap();
    let fpv = fs::read_to_string(tmp.path().join("fpv.txt")).unwrap();
    let image_lines: Vec<_> = images.lines().collect();
    let fpv_lines: Vec<_> = fpv.lines().collect();

    // Row i of fpv.txt belongs to row i of test_files.txt
    assert_eq!(image_lines.len(), fpv_lines.len());
    // Pool fits under max_num_samples: frame order is preserved
    assert_eq!(image_lines[0], "img_00002.jpg");
    assert_eq!(image_lines.last().unwrap(), &"img_00009.jpg");
    for line in &fpv_lines {
        let cols: Vec<f64> = line
            .split_whitespace()
            .map(|c| c.parse().unwrap())
            .collect();
        assert_eq!(cols.len(), 2);
        // Constant forward motion: target sits at fx*0.2+cx, cy
        assert!((cols[0] - 520.0).abs() < 1e-9);
        assert!((cols[1] - 240.0).abs() < 1e-9);
    }

    // No split requested, so no train manifest
    assert!(!tmp.path().join("train_folders.txt").exists());
}

#[test]
fn test_run_without_min_shift_keeps_nan_targets() {
    let tmp = TempDir::new().unwrap();
    write_video_dir(tmp.path(), "vid_a", &[(true, false); 6]);

    run(tmp.path(), &BuilderConfig::default()).unwrap();
    let fpv = fs::read_to_string(tmp.path().join("fpv.txt")).unwrap();
    let fpv_lines: Vec<_> = fpv.lines().collect();
    assert_eq!(fpv_lines.len(), 6);
    // First two rows have no displacement history and stay NaN
    assert!(fpv_lines[0].contains("NaN"));
    assert!(fpv_lines[1].contains("NaN"));
    assert!(!fpv_lines[2].contains("NaN"));
}

#[test]
fn test_run_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    write_video_dir(tmp.path(), "vid_a", &[(true, false); 20]);
    write_video_dir(tmp.path(), "vid_b", &[(true, false); 20]);

    let config = BuilderConfig {
        seed: 42,
        max_num_samples: 10,
        ..Default::default()
    };
    run(tmp.path(), &config).unwrap();
    let images_first = fs::read_to_string(tmp.path().join("test_files.txt")).unwrap();
    let fpv_first = fs::read_to_string(tmp.path().join("fpv.txt")).unwrap();

    run(tmp.path(), &config).unwrap();
    let images_second = fs::read_to_string(tmp.path().join("test_files.txt")).unwrap();
    let fpv_second = fs::read_to_string(tmp.path().join("fpv.txt")).unwrap();

    assert_eq!(images_first, images_second);
    assert_eq!(fpv_first, fpv_second);
}

#[test]
fn test_run_caps_output_at_max_num_samples() {
    let tmp = TempDir::new().unwrap();
    write_video_dir(tmp.path(), "vid_a", &[(true, false); 30]);

    let config = BuilderConfig {
        max_num_samples: 10,
        ..Default::default()
    };
    let summary = run(tmp.path(), &config).unwrap();
    assert_eq!(summary.pool_size, 30);
    assert_eq!(summary.num_written, 10);
    let images = fs::read_to_string(tmp.path().join("test_files.txt")).unwrap();
    assert_eq!(images.lines().count(), 10);
}

#[test]
fn test_run_split_writes_train_folders() {
    let tmp = TempDir::new().unwrap();
    for name in ["vid_a", "vid_b", "vid_c", "vid_d"] {
        write_video_dir(tmp.path(), name, &[(true, false); 10]);
    }

    let config = BuilderConfig {
        split: 0.5,
        seed: 42,
        ..Default::default()
    };
    let summary = run(tmp.path(), &config).unwrap();
    assert_eq!(summary.num_train_videos, 2);
    assert_eq!(summary.num_eval_videos, 2);

    let train = fs::read_to_string(tmp.path().join("train_folders.txt")).unwrap();
    assert_eq!(train.lines().count(), 2);

    // Same seed on a rerun picks the same folders
    run(tmp.path(), &config).unwrap();
    let train_again = fs::read_to_string(tmp.path().join("train_folders.txt")).unwrap();
    assert_eq!(train, train_again);
}

#[test]
fn test_run_fails_on_missing_metadata() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("vid_a");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("img_00000.jpg"), b"jpg").unwrap();

    assert!(run(tmp.path(), &BuilderConfig::default()).is_err());
}

#[test]
fn test_run_fails_on_empty_pool() {
    let tmp = TempDir::new().unwrap();
    // Frames exist but none were ever registered
    write_video_dir(tmp.path(), "vid_a", &[(false, false); 10]);

    assert!(run(tmp.path(), &BuilderConfig::default()).is_err());
}
