//! Threshold computation for a single feature, and row subsampling.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Thresholds for one feature column.
///
/// NaN values are ignored. With at most `max_bins` distinct values every
/// distinct value gets its own bin; otherwise `max_bins - 1` thresholds are
/// placed at the sample percentiles `100 * i / max_bins` using midpoint
/// interpolation over the sorted column.
pub(crate) fn find_thresholds(mut values: Vec<f32>, max_bins: usize) -> Vec<f32> {
    values.retain(|v| !v.is_nan());
    if values.is_empty() {
        return Vec::new();
    }
    values.sort_unstable_by(f32::total_cmp);

    let n_distinct = 1 + values.windows(2).filter(|w| w[0] != w[1]).count();

    if n_distinct <= max_bins {
        return values
            .windows(2)
            .filter(|w| w[0] != w[1])
            .map(|w| midpoint(w[0], w[1]))
            .collect();
    }

    // Rank of percentile i is i * (n - 1) / max_bins; integer arithmetic keeps
    // exact ranks exact.
    let n = values.len();
    (1..max_bins)
        .map(|i| {
            let rank = i * (n - 1);
            let lo = rank / max_bins;
            if rank % max_bins == 0 {
                values[lo]
            } else {
                midpoint(values[lo], values[lo + 1])
            }
        })
        .collect()
}

/// Midpoint of `lo <= hi`, never equal to `hi` unless `lo == hi`.
///
/// When the `f32` midpoint of two adjacent floats rounds up to `hi`, or is
/// undefined as for `-inf` and `+inf`, `lo` is returned so that `lo` and `hi`
/// still land in different bins.
#[inline]
fn midpoint(lo: f32, hi: f32) -> f32 {
    let mid = ((lo as f64 + hi as f64) * 0.5) as f32;
    if mid < hi {
        mid
    } else {
        lo
    }
}

/// Draw `n_rows` distinct row indices out of `n_samples`, sorted ascending.
///
/// Deterministic for a given `seed`; `None` seeds from OS entropy.
pub(crate) fn subsample_rows(n_samples: usize, n_rows: usize, seed: Option<u64>) -> Vec<usize> {
    let mut rng = match seed {
        Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
        None => Xoshiro256PlusPlus::from_entropy(),
    };
    let mut rows = rand::seq::index::sample(&mut rng, n_samples, n_rows.min(n_samples)).into_vec();
    rows.sort_unstable();
    rows
}
