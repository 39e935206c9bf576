// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Randomly permutes the known observations and cuts the
// permutation at one index:
//   - Training set:   the first floor(N * train_ratio) items
//   - Validation set: everything after
//
// A single permutation split at a single index means the two
// sets can neither overlap nor leave gaps. The split is not
// stratified, so one time range or grid region may land
// mostly on one side.
//
// The RNG is seeded from configuration, so rerunning with the
// same seed reproduces the same partition.
//
// Example with N = 10 and train_ratio = 0.8:
//
//   known:        o0 o1 o2 o3 o4 o5 o6 o7 o8 o9
//   shuffled:     o7 o2 o9 o0 o5 o3 o8 o1 o6 o4
//                 └──────── train (8) ───────┘ └ val (2) ┘
//
// Why shuffle instead of taking the last days as validation?
//   The unknown cells this model is asked about are scattered
//   across the whole time range, not only at its end. A random
//   cut makes validation look like those queries: same hours,
//   same weekdays, same cells, just with the labels hidden.
//   A time-based cut would measure extrapolation instead.
//
// Why floor and not round?
//   floor(N * r) <= N * r < N whenever r < 1.0, so any ratio
//   below one leaves at least one validation sample for N > 0.
//   Rounding would send the single sample of N = 1, r = 0.8
//   into training and leave nothing to score the model on.
//
// Edge cases:
//   train_ratio = 1.0  →  validation is empty; training later
//                         fails with EmptyPartition("validation")
//   train_ratio = 0.0  →  training is empty
//   N = 0              →  both sides empty, nothing panics
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with a seeded RNG and split into (train, validation).
///
/// # Arguments
/// * `samples`     - All available samples (consumed by this function)
/// * `train_ratio` - Proportion for training, e.g. 0.8 = 80%. Clamped to [0, 1].
/// * `seed`        - Seed for the permutation
///
/// # Returns
/// A tuple (train_samples, val_samples)
pub fn split_train_val<T>(mut samples: Vec<T>, train_ratio: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total    = samples.len();
    let split_at = train_count(total, train_ratio);

    // split_off(n) removes elements [n..] from the Vec and returns them
    let val = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation ({}% / {}%)",
        samples.len(),
        val.len(),
        (samples.len() * 100) / total.max(1),
        (val.len()     * 100) / total.max(1),
    );

    (samples, val)
}

/// floor(total * ratio), clamped so it never exceeds `total`
pub fn train_count(total: usize, train_ratio: f64) -> usize {
    let ratio = train_ratio.clamp(0.0, 1.0);
    (((total as f64) * ratio).floor() as usize).min(total)
}
