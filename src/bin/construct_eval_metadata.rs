use std::path::PathBuf;

use clap::Parser;
use drone_dataset_prep::builder::{BuilderConfig, run};

/// Select and split converted video sequences into KITTI-style
/// train/test manifests with FPV targets.
#[derive(Parser)]
#[command(version, about, author)]
struct Cli {
    /// folder containing the converted dataset
    #[arg(long = "dataset_dir", value_name = "DIR")]
    dataset_dir: PathBuf,

    /// proportion between train and test. By default, the whole dataset
    /// serves for evaluation
    #[arg(long, default_value_t = 0.0)]
    split: f64,

    /// seed for random classification between train and val
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long = "max_num_samples", default_value_t = 500)]
    max_num_samples: usize,

    /// minimum of former frames with valid odometry
    #[arg(long = "min_shift", default_value_t = 0)]
    min_shift: usize,

    /// consider frames with interpolated odometry to be valid
    #[arg(long = "allow_interpolated_frames")]
    allow_interpolated_frames: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = BuilderConfig {
        split: cli.split,
        seed: cli.seed,
        max_num_samples: cli.max_num_samples,
        min_shift: cli.min_shift,
        allow_interpolated_frames: cli.allow_interpolated_frames,
    };
    let summary = run(&cli.dataset_dir, &config)?;
    println!(
        "wrote {} of {} pooled frames ({} train videos, {} eval videos)",
        summary.num_written, summary.pool_size, summary.num_train_videos, summary.num_eval_videos
    );
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
