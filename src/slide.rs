//! Exhaustive offset search of the sub image across the base image.
//!
//! Every offset at which the sub image lies fully inside the base image is
//! scored with the mutual information of the overlapping pixels. The scores
//! form the hypersurface; its maximum marks the most suitable overlap.

use crate::error::ScriptError;
use crate::mutual_info::{self, MAX_BINS};
use ndarray::{s, Array2};

/// The result of sliding a sub image across a base image.
///
/// This struct is the output of the `slide_images` function and serves as
/// the input for the hypersurface writer and the final report.
#[derive(Debug)]
pub struct SlideOutcome {
    /// Mutual information per offset; element `[dy, dx]` scores the base
    /// window whose top-left corner is at `(dy, dx)`.
    pub hypersurface: Array2<f64>,
    /// Offset `(dy, dx)` with the highest mutual information.
    pub best_offset: (usize, usize),
    /// Mutual information at `best_offset`, in nats.
    pub best_mi: f64,
}

/// Scores every admissible offset of the sub image inside the base image.
///
/// The offset grid has `base_h - sub_h + 1` rows and `base_w - sub_w + 1`
/// columns. On ties, the first maximum in row-major order wins.
///
/// # Arguments
///
/// * `base` - Base image pixels, `(rows, cols)` layout.
/// * `sub` - Sub image pixels; must fit entirely inside `base`.
/// * `bins` - Histogram bin count for the metric.
///
/// # Errors
///
/// Returns `ScriptError::InvalidBinCount` for a bin count outside 2..=256
/// and `ScriptError::SubImageDoesNotFit` when the sub image is empty or
/// larger than the base image in either dimension.
pub fn slide_images(
    base: &Array2<u8>,
    sub: &Array2<u8>,
    bins: usize,
) -> Result<SlideOutcome, ScriptError> {
    if !(2..=MAX_BINS).contains(&bins) {
        return Err(ScriptError::InvalidBinCount(bins));
    }

    let (base_h, base_w) = base.dim();
    let (sub_h, sub_w) = sub.dim();
    if sub_h == 0 || sub_w == 0 || sub_h > base_h || sub_w > base_w {
        return Err(ScriptError::SubImageDoesNotFit {
            base_w,
            base_h,
            sub_w,
            sub_h,
        });
    }

    let rows = base_h - sub_h + 1;
    let cols = base_w - sub_w + 1;
    let mut hypersurface = Array2::<f64>::zeros((rows, cols));

    for dy in 0..rows {
        for dx in 0..cols {
            let window = base.slice(s![dy..dy + sub_h, dx..dx + sub_w]);
            hypersurface[[dy, dx]] = mutual_info::mutual_information(window, sub.view(), bins);
        }
    }

    // Row-major argmax; the first maximum wins on ties.
    let mut best_offset = (0, 0);
    let mut best_mi = f64::NEG_INFINITY;
    for ((dy, dx), &mi) in hypersurface.indexed_iter() {
        if mi > best_mi {
            best_mi = mi;
            best_offset = (dy, dx);
        }
    }

    Ok(SlideOutcome {
        hypersurface,
        best_offset,
        best_mi,
    })
}
