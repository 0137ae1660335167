//! Mutual information of grayscale pixel windows.
//!
//! The metric is computed from a joint histogram of two equal-shape
//! windows: pixels are quantized into `bins` levels, paired per position,
//! and the mutual information of the resulting joint distribution is
//! summed in nats. A window compared against itself yields its Shannon
//! entropy; independent windows yield zero.

use ndarray::ArrayView2;

/// Upper limit for the histogram bin count; 8-bit pixels cannot be
/// quantized any finer.
pub const MAX_BINS: usize = 256;

/// Maps an 8-bit pixel onto one of `bins` equally wide levels.
fn bin_index(pixel: u8, bins: usize) -> usize {
    pixel as usize * bins / 256
}

/// Computes the mutual information (in nats) of two equal-shape windows.
///
/// Both views are paired elementwise in row-major order, so the value at
/// `(r, c)` of `a` is matched with the value at `(r, c)` of `b`.
///
/// # Arguments
///
/// * `a` - First grayscale window.
/// * `b` - Second grayscale window, same shape as `a`.
/// * `bins` - Number of histogram levels per window, 2..=256.
pub fn mutual_information(a: ArrayView2<u8>, b: ArrayView2<u8>, bins: usize) -> f64 {
    debug_assert_eq!(a.dim(), b.dim());

    let mut joint = vec![0u64; bins * bins];
    for (&pa, &pb) in a.iter().zip(b.iter()) {
        joint[bin_index(pa, bins) * bins + bin_index(pb, bins)] += 1;
    }

    mutual_information_from_joint(&joint, bins)
}

/// Computes the Shannon entropy (in nats) of a single window.
pub fn entropy(a: ArrayView2<u8>, bins: usize) -> f64 {
    let mut counts = vec![0u64; bins];
    for &p in a.iter() {
        counts[bin_index(p, bins)] += 1;
    }

    let n = a.len() as f64;
    if n == 0.0 {
        return 0.0;
    }

    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.ln()
        })
        .sum()
}

/// Sums `p_ij * ln(p_ij / (p_i * q_j))` over the non-empty joint cells.
fn mutual_information_from_joint(joint: &[u64], bins: usize) -> f64 {
    let total: u64 = joint.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;

    let mut row_marginal = vec![0u64; bins];
    let mut col_marginal = vec![0u64; bins];
    for i in 0..bins {
        for j in 0..bins {
            let count = joint[i * bins + j];
            row_marginal[i] += count;
            col_marginal[j] += count;
        }
    }

    let mut mi = 0.0;
    for i in 0..bins {
        if row_marginal[i] == 0 {
            continue;
        }
        let p_i = row_marginal[i] as f64 / n;
        for j in 0..bins {
            let count = joint[i * bins + j];
            if count == 0 {
                continue;
            }
            let p_ij = count as f64 / n;
            let q_j = col_marginal[j] as f64 / n;
            mi += p_ij * (p_ij / (p_i * q_j)).ln();
        }
    }
    mi
}
