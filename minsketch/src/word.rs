//! Trait of hash words parameterizing the sketch width.
use std::fmt::Debug;
use std::hash::Hash;

use num_traits::int::PrimInt;
use num_traits::ops::wrapping::WrappingAdd;

/// Trait of an unsigned hash word.
///
/// The word width of a sketch is a construction parameter: a signature built
/// over `u32` words is four bytes per position, one over `u64` words is eight.
/// Sketches of different word types never mix.
pub trait HashWord:
    PrimInt + WrappingAdd + Hash + Debug + Default + Send + Sync + 'static
{
    /// Number of bytes in the big-endian representation.
    const BYTES: usize;

    /// Truncates a 64-bit hash into a word.
    fn from_hash(hash: u64) -> Self;

    /// Widens the word into a `u64`.
    fn widen(self) -> u64;

    /// Appends the big-endian bytes of the word.
    fn write_be(self, buf: &mut Vec<u8>);

    /// Reads a word from exactly [`Self::BYTES`] big-endian bytes.
    fn read_be(bytes: &[u8]) -> Self;
}

impl HashWord for u32 {
    const BYTES: usize = 4;

    #[inline(always)]
    fn from_hash(hash: u64) -> Self {
        hash as u32
    }

    #[inline(always)]
    fn widen(self) -> u64 {
        self as u64
    }

    #[inline(always)]
    fn write_be(self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_be_bytes());
    }

    #[inline(always)]
    fn read_be(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), Self::BYTES);
        Self::from_be_bytes(bytes.try_into().unwrap())
    }
}

impl HashWord for u64 {
    const BYTES: usize = 8;

    #[inline(always)]
    fn from_hash(hash: u64) -> Self {
        hash
    }

    #[inline(always)]
    fn widen(self) -> u64 {
        self
    }

    #[inline(always)]
    fn write_be(self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_be_bytes());
    }

    #[inline(always)]
    fn read_be(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), Self::BYTES);
        Self::from_be_bytes(bytes.try_into().unwrap())
    }
}
