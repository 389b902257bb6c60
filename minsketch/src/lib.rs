//! Probabilistic sketches of sets of byte strings, supporting cardinality,
//! Jaccard, and containment estimation.
#![deny(missing_docs)]

pub mod codec;
pub mod errors;
pub mod hasher;
pub mod kmv;
pub mod minwise;
pub mod word;

pub use errors::SketchError;
pub use minwise::{containment, similarity_bbit, MinWise};
pub use word::HashWord;
