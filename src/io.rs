use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::types::PooledFrame;

/// Writes the newline-delimited list of sampled image paths.
pub fn write_image_list(output_path: &Path, frames: &[PooledFrame]) -> Result<()> {
    let mut file = manifest_writer(output_path)?;
    for f in frames {
        writeln!(file, "{}", f.image_path)?;
    }
    Ok(())
}

/// Writes the two-column FPV table, row-aligned with the image list.
///
/// Non-finite targets are written verbatim (`NaN`, `inf`); dropping them
/// here would break the row alignment contract.
pub fn write_fpv_table(output_path: &Path, frames: &[PooledFrame]) -> Result<()> {
    let mut file = manifest_writer(output_path)?;
    for f in frames {
        writeln!(file, "{} {}", f.fpv_x, f.fpv_y)?;
    }
    Ok(())
}

/// Writes the newline-delimited list of training video folders.
pub fn write_train_folders(output_path: &Path, train_dirs: &[PathBuf]) -> Result<()> {
    let mut file = manifest_writer(output_path)?;
    for dir in train_dirs {
        writeln!(file, "{}", dir.display())?;
    }
    Ok(())
}

fn manifest_writer(output_path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(output_path)
        .with_context(|| format!("failed to create {}", output_path.display()))?;
    Ok(BufWriter::new(file))
}
