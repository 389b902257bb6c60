//! The LSH probability model and per-partition parameter selection.
//!
//! A banded LSH with `b` bands of `r` rows retrieves a record of Jaccard
//! similarity `j` with probability `1 - (1 - j^r)^b`. Containment thresholds
//! are mapped onto this curve through the size ratio `|X|/|Q|`, and `(b, r)`
//! is chosen per partition by minimising the integrated false-positive and
//! false-negative probabilities around the threshold.

/// Banding parameters of one partition's LSH table, immutable after build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LshParams {
    /// Number of bands.
    pub bands: usize,
    /// Rows (signature words) per band.
    pub rows: usize,
}

// Quantization step of the numeric integrals below.
const INTEGRATION_PRECISION: f64 = 0.01;

/// Probability that a banded LSH retrieves a record with Jaccard similarity
/// `jaccard` against the query.
pub fn collision_probability(jaccard: f64, bands: usize, rows: usize) -> f64 {
    1. - (1. - jaccard.powi(rows as i32)).powi(bands as i32)
}

/// Converts a containment threshold into the equivalent Jaccard threshold for
/// a domain of size `x_size` and a query of size `q_size`.
///
/// Inverse of `c = (x/q + 1) * j / (1 + j)`.
pub fn containment_to_jaccard(containment: f64, x_size: usize, q_size: usize) -> f64 {
    let ratio = x_size as f64 / q_size as f64;
    containment / (ratio + 1. - containment)
}

// Midpoint-rectangle integration.
fn integral<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, precision: f64) -> f64 {
    let mut area = 0.;
    let mut x = a + precision / 2.;
    while x < b {
        area += f(x) * precision;
        x += precision;
    }
    area
}

/// Probability that a domain of size `x_size` with true containment below
/// `threshold` collides with a query of size `q_size` anyway, integrated over
/// the containment range `(0, threshold)`.
pub fn false_positive_probability(
    x_size: usize,
    q_size: usize,
    bands: usize,
    rows: usize,
    threshold: f64,
) -> f64 {
    integral(
        |c| collision_probability(containment_to_jaccard(c, x_size, q_size), bands, rows),
        0.,
        threshold,
        INTEGRATION_PRECISION,
    )
}

/// Probability that a domain of size `x_size` with true containment at or
/// above `threshold` is missed, integrated over `(threshold, 1)`.
pub fn false_negative_probability(
    x_size: usize,
    q_size: usize,
    bands: usize,
    rows: usize,
    threshold: f64,
) -> f64 {
    integral(
        |c| 1. - collision_probability(containment_to_jaccard(c, x_size, q_size), bands, rows),
        threshold,
        1.,
        INTEGRATION_PRECISION,
    )
}

/// Exhaustively searches the `(bands, rows)` pair minimising the summed
/// false-positive and false-negative probability at `threshold`, subject to
/// `bands * rows <= num_hashes` and `rows <= max_rows`.
///
/// Returns the chosen pair together with its false-positive and
/// false-negative probabilities.
pub fn optimal_params(
    x_size: usize,
    q_size: usize,
    threshold: f64,
    num_hashes: usize,
    max_rows: usize,
) -> (LshParams, f64, f64) {
    let mut best = LshParams { bands: 1, rows: 1 };
    let mut best_fp = f64::MAX;
    let mut best_fn = f64::MAX;
    let mut min_error = f64::MAX;
    for rows in 1..=max_rows {
        for bands in 1..=num_hashes {
            if bands * rows > num_hashes {
                break;
            }
            let fp = false_positive_probability(x_size, q_size, bands, rows, threshold);
            let fn_ = false_negative_probability(x_size, q_size, bands, rows, threshold);
            if fp + fn_ < min_error {
                min_error = fp + fn_;
                best = LshParams { bands, rows };
                best_fp = fp;
                best_fn = fn_;
            }
        }
    }
    (best, best_fp, best_fn)
}
