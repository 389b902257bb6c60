//! k-minimum-values sketches.
//!
//! A KMV sketch keeps the k smallest hash values of a set under a shared hash
//! ordering, mapped into `(0, 1)` by the golden-ratio fractional-part
//! transform. Because two sketches of the same k share that ordering, their
//! intersection and union sizes can be read off the sorted signatures
//! directly, yielding an alternative containment estimator to the MinWise one.
use crate::errors::{Result, SketchError};
use crate::hasher::hash_bytes;

/// Maps a 64-bit hash into a uniform value in `(0, 1)` by the fractional part
/// of `phi * (v + 1)`.
#[inline]
pub fn golden_ratio_transform(hash: u64) -> f64 {
    let phi = (1. + 5f64.sqrt()) / 2.;
    let scaled = (hash as f64 + 1.) * phi;
    scaled - scaled.floor()
}

/// Builds the KMV signature of a set: the k smallest transformed hash values
/// in ascending order.
///
/// If the set holds fewer than k values the signature is shorter than k;
/// [`estimate_containment`] requires signatures of common k.
pub fn sketch<I, T>(values: I, k: usize, seed: u64) -> Vec<f64>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut sig: Vec<f64> = values
        .into_iter()
        .map(|v| golden_ratio_transform(hash_bytes(v.as_ref(), seed)))
        .collect();
    sig.sort_unstable_by(f64::total_cmp);
    sig.truncate(k);
    sig
}

/// Estimates the containment of Q in X from two KMV signatures of common k
/// using the unbiased estimator `i * (k - 1) / (k * u[k-1])`, where `i` is the
/// intersection count of the signatures and `u[k-1]` the k-th smallest value
/// of their union.
///
/// Signatures shorter than k fail with `ShapeMismatch`. The result is clamped
/// to `[0, 1]`; k must be at least 2 for the estimate to be meaningful.
pub fn estimate_containment(q: &[f64], x: &[f64], k: usize) -> Result<f64> {
    if q.len() < k {
        return Err(SketchError::shape_mismatch(k, q.len()));
    }
    if x.len() < k {
        return Err(SketchError::shape_mismatch(k, x.len()));
    }
    let q = &q[..k];
    let x = &x[..k];
    let i = intersection_size(q, x);
    let u = kth_union_value(q, x, k);
    let est = (i as f64 * (k - 1) as f64) / (k as f64 * u);
    Ok(est.clamp(0., 1.))
}

// Classical two-pointer walk over the sorted signatures.
fn intersection_size(a: &[f64], b: &[f64]) -> usize {
    let mut i = 0;
    let mut j = 0;
    let mut count = 0;
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            count += 1;
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            i += 1;
        } else {
            j += 1;
        }
    }
    count
}

// Sorted merge of the signatures, deduplicating equal values, stopping at the
// k-th union element.
fn kth_union_value(a: &[f64], b: &[f64], k: usize) -> f64 {
    let mut i = 0;
    let mut j = 0;
    let mut taken = 0;
    let mut value = 0.;
    while taken < k {
        value = if i < a.len() && (j >= b.len() || a[i] <= b[j]) {
            if j < b.len() && a[i] == b[j] {
                j += 1;
            }
            let v = a[i];
            i += 1;
            v
        } else {
            let v = b[j];
            j += 1;
            v
        };
        taken += 1;
    }
    value
}
