//! Banded LSH tables.
use std::marker::PhantomData;

use hashbrown::{HashMap, HashSet};

use minsketch::hasher::hash_bytes;
use minsketch::HashWord;

use crate::params::LshParams;

// Fixed seed of the band-key hash. Band keys must be stable across runs and
// processes, so the seed is a constant rather than derived from the sketch
// seed.
const BAND_HASH_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// A banded LSH table over signatures of one partition.
///
/// The signature is split into `bands` bands of `rows` words each; every band
/// is hashed to a 64-bit band key and maps the key to the record slots whose
/// signature shares the band. Insertion and lookup are both `O(bands)`.
#[derive(Clone, Debug)]
pub struct LshTable<W> {
    bands: Vec<HashMap<u64, Vec<u32>>>,
    rows: usize,
    _marker: PhantomData<W>,
}

impl<W: HashWord> LshTable<W> {
    /// Creates an empty table with the given banding parameters.
    pub fn new(params: LshParams) -> Self {
        Self {
            bands: vec![HashMap::new(); params.bands],
            rows: params.rows,
            _marker: PhantomData,
        }
    }

    /// Gets the banding parameters.
    pub fn params(&self) -> LshParams {
        LshParams {
            bands: self.bands.len(),
            rows: self.rows,
        }
    }

    /// Inserts a record slot under every band key of its signature.
    ///
    /// The signature must span at least `bands * rows` words; the caller
    /// validates lengths against the index.
    pub fn insert(&mut self, slot: u32, signature: &[W]) {
        debug_assert!(self.bands.len() * self.rows <= signature.len());
        let mut buf = Vec::with_capacity(self.rows * W::BYTES);
        for (map, chunk) in self.bands.iter_mut().zip(signature.chunks_exact(self.rows)) {
            map.entry(band_key(chunk, &mut buf)).or_default().push(slot);
        }
    }

    /// Collects into `out` every slot sharing at least one band key with the
    /// signature. A slot is yielded at most once.
    pub fn probe(&self, signature: &[W], out: &mut HashSet<u32>) {
        debug_assert!(self.bands.len() * self.rows <= signature.len());
        let mut buf = Vec::with_capacity(self.rows * W::BYTES);
        for (map, chunk) in self.bands.iter().zip(signature.chunks_exact(self.rows)) {
            if let Some(slots) = map.get(&band_key(chunk, &mut buf)) {
                out.extend(slots.iter().copied());
            }
        }
    }

    /// Gets the memory usage in bytes, excluding map overhead.
    pub fn memory_in_bytes(&self) -> usize {
        self.bands
            .iter()
            .flat_map(|map| map.values())
            .map(|slots| std::mem::size_of::<u64>() + slots.len() * std::mem::size_of::<u32>())
            .sum()
    }

    pub(crate) fn band_maps(&self) -> &[HashMap<u64, Vec<u32>>] {
        &self.bands
    }

    pub(crate) fn from_band_maps(bands: Vec<HashMap<u64, Vec<u32>>>, rows: usize) -> Self {
        Self {
            bands,
            rows,
            _marker: PhantomData,
        }
    }
}

// Serializes the band words big-endian and hashes the bytes to a stable key.
fn band_key<W: HashWord>(words: &[W], buf: &mut Vec<u8>) -> u64 {
    buf.clear();
    for &w in words {
        w.write_be(buf);
    }
    hash_bytes(buf, BAND_HASH_SEED)
}
