//! Error definitions.
use std::error::Error;
use std::{fmt, result};

/// A specialized Result type for this library.
pub type Result<T, E = SketchError> = result::Result<T, E>;

/// Errors in this library.
#[derive(Debug)]
pub enum SketchError {
    /// Two sketches of unequal shape were combined.
    ShapeMismatch {
        /// Length of the left-hand sketch.
        expected: usize,
        /// Length of the right-hand sketch.
        actual: usize,
    },
    /// A byte slice could not be parsed into a sketch.
    Decode(String),
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "ShapeMismatch: expected length {expected}, got {actual}")
            }
            Self::Decode(msg) => write!(f, "DecodeError: {msg}"),
        }
    }
}

impl Error for SketchError {}

impl SketchError {
    pub(crate) const fn shape_mismatch(expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch { expected, actual }
    }

    pub(crate) const fn decode(msg: String) -> Self {
        Self::Decode(msg)
    }
}
