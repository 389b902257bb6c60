//! Byte serialization of signatures.
//!
//! A signature serializes to the big-endian concatenation of its hash words.
//! The parse side must know the word width; the length in words is the byte
//! length divided by the word width.
use crate::errors::{Result, SketchError};
use crate::word::HashWord;

/// Serializes a signature into bytes.
pub fn sig_to_bytes<W: HashWord>(sig: &[W]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(sig.len() * W::BYTES);
    for &v in sig {
        v.write_be(&mut buf);
    }
    buf
}

/// Parses bytes into a signature, failing on truncated input.
pub fn bytes_to_sig<W: HashWord>(bytes: &[u8]) -> Result<Vec<W>> {
    if bytes.len() % W::BYTES != 0 {
        return Err(SketchError::decode(format!(
            "signature byte length {} is not a multiple of the word width {}",
            bytes.len(),
            W::BYTES
        )));
    }
    Ok(bytes.chunks_exact(W::BYTES).map(W::read_be).collect())
}
