//! Containment search over large catalogs of sets.
//!
//! Given a catalog of sets of byte strings and a query set Q, the index
//! returns the catalog domains X whose containment of Q, `|Q ∩ X| / |Q|`,
//! meets a threshold. Domains are sketched with MinWise hashing
//! ([`minsketch`]), partitioned by set size, and indexed by one banded LSH
//! table per partition, each tuned to its partition's worst-case size ratio.
//!
//! # Approach
//!
//! The build steps consist of
//!
//! 1. Sketch every domain into a fixed-length MinWise signature.
//! 2. Sort the records by set size and cut them into contiguous partitions.
//! 3. Pick banding parameters per partition from the LSH error model and
//!    insert each record into its partition's table.
//!
//! Queries probe all partitions, deduplicate the candidates, and optionally
//! re-check each candidate's containment estimate against the threshold.
//!
//! # Examples
//!
//! ```
//! use lsh_ensemble::{DomainRecord, EnsembleBuilder};
//! use minsketch::MinWise;
//!
//! // Sketch three domains over u64 hash words (with random seed value 42).
//! let sketch = |range: std::ops::Range<u64>| {
//!     let mut mw = MinWise::<u64>::new(42, 128);
//!     for v in range {
//!         mw.push(&v.to_be_bytes());
//!     }
//!     mw.into_signature()
//! };
//! let records = vec![
//!     DomainRecord { key: "a", size: 100, signature: sketch(0..100) },
//!     DomainRecord { key: "b", size: 150, signature: sketch(50..200) },
//!     DomainRecord { key: "c", size: 200, signature: sketch(500..700) },
//! ];
//!
//! // Build the index and search for domains containing most of [0, 100).
//! let index = EnsembleBuilder::new(2, 128, 4)
//!     .unwrap()
//!     .build(records)
//!     .unwrap();
//! let results = index.query_filtered(&sketch(0..100), 100, 0.9).unwrap();
//! assert_eq!(results, vec!["a"]);
//! ```
#![deny(missing_docs)]

pub mod cancel;
pub mod ensemble;
pub mod errors;
pub mod format;
pub mod params;
pub mod partition;
pub mod record;
pub mod table;

pub use cancel::CancelToken;
pub use ensemble::{EnsembleBuilder, LshEnsemble};
pub use errors::EnsembleError;
pub use format::KeyBytes;
pub use params::LshParams;
pub use partition::{Partition, PartitionMode};
pub use record::{sort_by_size, DomainRecord};
