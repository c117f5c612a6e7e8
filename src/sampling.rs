use std::path::PathBuf;

use rand::Rng;
use rand::seq::SliceRandom;

/// Shuffles the discovered video folders and splits them into a training
/// set of `floor(n * split)` folders and an evaluation set holding the
/// rest.
///
/// `split = 0` reserves nothing for training. The partition only depends
/// on the RNG state, so a seeded generator makes it reproducible.
pub fn split_videos<R: Rng + ?Sized>(
    mut video_dirs: Vec<PathBuf>,
    split: f64,
    rng: &mut R,
) -> (Vec<PathBuf>, Vec<PathBuf>) {
    video_dirs.shuffle(rng);
    let n_train = ((video_dirs.len() as f64 * split) as usize).min(video_dirs.len());
    let eval_dirs = video_dirs.split_off(n_train);
    (video_dirs, eval_dirs)
}

/// Caps the pool at `max_num_samples` rows.
///
/// A pool that already fits is returned untouched, in order. A larger
/// pool is sampled uniformly without replacement; the output keeps the
/// draw order.
pub fn sample_bounded<T, R: Rng + ?Sized>(
    pool: Vec<T>,
    max_num_samples: usize,
    rng: &mut R,
) -> Vec<T> {
    if pool.len() <= max_num_samples {
        return pool;
    }
    let mut slots: Vec<Option<T>> = pool.into_iter().map(Some).collect();
    rand::seq::index::sample(rng, slots.len(), max_num_samples)
        .into_iter()
        .map(|i| slots[i].take().unwrap())
        .collect()
}
