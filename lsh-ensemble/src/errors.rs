//! Error definitions.
use std::error::Error;
use std::{fmt, result};

use minsketch::SketchError;

/// A specialized Result type for this library.
pub type Result<T, E = EnsembleError> = result::Result<T, E>;

/// Errors in this library.
///
/// All errors are fatal at the API boundary: the index never retries or
/// recovers locally.
#[derive(Debug)]
pub enum EnsembleError {
    /// A signature length does not match the index.
    ShapeMismatch {
        /// Signature length the index was built with.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },
    /// A containment threshold outside `(0, 1]`.
    InvalidThreshold(f64),
    /// Invalid build parameters.
    InvalidParams(String),
    /// Build was called with zero records.
    EmptyInput,
    /// A persisted index could not be parsed.
    Decode(String),
    /// A query was aborted via its cancellation token.
    Cancelled,
}

impl fmt::Display for EnsembleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "ShapeMismatch: index expects signatures of length {expected}, got {actual}")
            }
            Self::InvalidThreshold(t) => {
                write!(f, "InvalidThreshold: {t} is outside (0, 1]")
            }
            Self::InvalidParams(msg) => write!(f, "InvalidParams: {msg}"),
            Self::EmptyInput => write!(f, "EmptyInput: no records to index"),
            Self::Decode(msg) => write!(f, "DecodeError: {msg}"),
            Self::Cancelled => write!(f, "Cancelled: query aborted"),
        }
    }
}

impl Error for EnsembleError {}

impl EnsembleError {
    pub(crate) const fn shape_mismatch(expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch { expected, actual }
    }

    pub(crate) const fn invalid_params(msg: String) -> Self {
        Self::InvalidParams(msg)
    }

    pub(crate) const fn decode(msg: String) -> Self {
        Self::Decode(msg)
    }
}

impl From<SketchError> for EnsembleError {
    fn from(e: SketchError) -> Self {
        match e {
            SketchError::ShapeMismatch { expected, actual } => {
                Self::ShapeMismatch { expected, actual }
            }
            SketchError::Decode(msg) => Self::Decode(msg),
        }
    }
}
