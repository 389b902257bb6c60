//! MinWise hashing for Jaccard and containment estimation.
use crate::errors::{Result, SketchError};
use crate::hasher::{hash_bytes, SeedPair};
use crate::word::HashWord;

/// A collection of minimum hashes for a set of byte strings.
///
/// The signature is produced by the double-hashing construction: each pushed
/// value is hashed twice, and position `i` of the signature tracks the minimum
/// of `h1(v) + i * h2(v)` (wrapping) over all pushed values. The fraction of
/// equal positions between two signatures built from the same seed is an
/// unbiased estimate of the Jaccard similarity of the underlying sets, with
/// variance `O(1 / num_hashes)`.
///
/// # Examples
///
/// ```
/// use minsketch::MinWise;
///
/// let mut a = MinWise::<u64>::new(42, 256);
/// let mut b = MinWise::<u64>::new(42, 256);
/// for v in 0u64..100 {
///     a.push(&v.to_be_bytes());
/// }
/// for v in 0u64..100 {
///     b.push(&v.to_be_bytes());
/// }
/// assert_eq!(a.jaccard(&b).unwrap(), 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct MinWise<W> {
    seeds: SeedPair,
    minimums: Vec<W>,
}

impl<W: HashWord> MinWise<W> {
    /// Creates a sketch of `num_hashes` positions, all initialised to the
    /// maximum representable word.
    pub fn new(seed: u64, num_hashes: usize) -> Self {
        assert!(num_hashes >= 1);
        Self {
            seeds: SeedPair::expand(seed),
            minimums: vec![W::max_value(); num_hashes],
        }
    }

    /// Rebuilds a sketch from a previously exported signature.
    ///
    /// The seed must be the one the signature was built with, or further
    /// pushes and comparisons are meaningless.
    pub fn from_signature(seed: u64, signature: Vec<W>) -> Self {
        Self {
            seeds: SeedPair::expand(seed),
            minimums: signature,
        }
    }

    /// Adds an element to the set.
    ///
    /// Push order never affects the final signature.
    pub fn push(&mut self, bytes: &[u8]) {
        let v1 = W::from_hash(hash_bytes(bytes, self.seeds.seed1));
        let v2 = W::from_hash(hash_bytes(bytes, self.seeds.seed2));
        // Position i receives v1 + i*v2, accumulated by wrapping addition.
        let mut hv = v1;
        for m in self.minimums.iter_mut() {
            if hv < *m {
                *m = hv;
            }
            hv = hv.wrapping_add(&v2);
        }
    }

    /// Combines the signature of the second set, producing the signature of
    /// their union.
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        if self.minimums.len() != other.minimums.len() {
            return Err(SketchError::shape_mismatch(
                self.minimums.len(),
                other.minimums.len(),
            ));
        }
        for (m, &v) in self.minimums.iter_mut().zip(other.minimums.iter()) {
            if v < *m {
                *m = v;
            }
        }
        Ok(())
    }

    /// Estimates the cardinality of the set.
    ///
    /// Meaningful only after at least one push; an untouched sketch evaluates
    /// to 0 and callers must guard against it.
    pub fn cardinality(&self) -> f64 {
        let max = W::max_value().widen() as f64;
        let mut sum = 0.;
        for &m in &self.minimums {
            sum += -((max - m.widen() as f64) / max).ln();
        }
        (self.minimums.len() - 1) as f64 / sum
    }

    /// Estimates the Jaccard similarity against another sketch of the same
    /// seed and length.
    pub fn jaccard(&self, other: &Self) -> Result<f64> {
        if self.minimums.len() != other.minimums.len() {
            return Err(SketchError::shape_mismatch(
                self.minimums.len(),
                other.minimums.len(),
            ));
        }
        let eq = self
            .minimums
            .iter()
            .zip(other.minimums.iter())
            .filter(|(a, b)| a == b)
            .count();
        Ok(eq as f64 / self.minimums.len() as f64)
    }

    /// Gets the signature.
    pub fn signature(&self) -> &[W] {
        &self.minimums
    }

    /// Extracts the signature.
    pub fn into_signature(self) -> Vec<W> {
        self.minimums
    }

    /// Gets the number of signature positions.
    pub fn num_hashes(&self) -> usize {
        self.minimums.len()
    }

    /// Packs the low `b` bits of each position into dense words.
    ///
    /// Values never straddle word boundaries, so each output word carries
    /// `width / b` positions and the unused high bits of the final word are
    /// zero.
    pub fn signature_bbit(&self, b: u32) -> Vec<W> {
        let width = (W::BYTES * 8) as u32;
        assert!(1 <= b && b <= width);
        let mask = bit_mask::<W>(b);
        let mut sig = vec![];
        let mut w = W::zero();
        let mut free = width;
        for &v in &self.minimums {
            if free < b {
                sig.push(w);
                w = W::zero();
                free = width;
            }
            w = (w << b as usize) | (v & mask);
            free -= b;
        }
        if free != width {
            sig.push(w);
        }
        sig
    }
}

/// Estimates similarity between two b-bit packed signatures by the fraction of
/// equal b-bit chunks. Approximates Jaccard for sufficiently large `b`.
pub fn similarity_bbit<W: HashWord>(sig1: &[W], sig2: &[W], b: u32) -> Result<f64> {
    if sig1.len() != sig2.len() {
        return Err(SketchError::shape_mismatch(sig1.len(), sig2.len()));
    }
    let width = (W::BYTES * 8) as u32;
    assert!(1 <= b && b <= width);
    let mask = bit_mask::<W>(b);
    let mut eq = 0;
    let mut count = 0;
    for (&w1, &w2) in sig1.iter().zip(sig2.iter()) {
        let mut w1 = w1;
        let mut w2 = w2;
        let mut bits = width;
        while bits >= b {
            count += 1;
            if w1 & mask == w2 & mask {
                eq += 1;
            }
            w1 = w1 >> b as usize;
            w2 = w2 >> b as usize;
            bits -= b;
        }
    }
    Ok(eq as f64 / count as f64)
}

/// Estimates the containment of Q in X, `|Q ∩ X| / |Q|`, from the signatures
/// and original set cardinalities.
///
/// The estimate is derived from the Jaccard estimate via
/// `c = (|X|/|Q| + 1) * j / (1 + j)` and clamped to `[0, 1]`. If either size
/// is 0, the result is defined to be 0.
pub fn containment<W: HashWord>(
    q: &[W],
    x: &[W],
    q_size: usize,
    x_size: usize,
) -> Result<f64> {
    if q.len() != x.len() {
        return Err(SketchError::shape_mismatch(q.len(), x.len()));
    }
    if q.is_empty() || q_size == 0 || x_size == 0 {
        return Ok(0.);
    }
    let eq = q.iter().zip(x.iter()).filter(|(a, b)| a == b).count();
    let jaccard = eq as f64 / q.len() as f64;
    let c = (x_size as f64 / q_size as f64 + 1.) * jaccard / (1. + jaccard);
    Ok(c.clamp(0., 1.))
}

fn bit_mask<W: HashWord>(b: u32) -> W {
    if b as usize == W::BYTES * 8 {
        W::max_value()
    } else {
        (W::one() << b as usize) - W::one()
    }
}
