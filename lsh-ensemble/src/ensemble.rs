//! The LSH Ensemble index: one banded LSH table per size partition.
use std::ops::Range;
use std::time::{Duration, Instant};

use hashbrown::HashSet;
use rayon::prelude::*;

use minsketch::{containment, HashWord};

use crate::cancel::CancelToken;
use crate::errors::{EnsembleError, Result};
use crate::params::{containment_to_jaccard, optimal_params, LshParams};
use crate::partition::{plan_cost_optimal, plan_equi_depth, Partition, PartitionMode};
use crate::record::DomainRecord;
use crate::table::LshTable;

/// Configures and builds an [`LshEnsemble`].
///
/// # Examples
///
/// ```
/// use lsh_ensemble::{DomainRecord, EnsembleBuilder};
/// use minsketch::MinWise;
///
/// let records: Vec<DomainRecord<u64, String>> = (0..4)
///     .map(|i| {
///         let mut mw = MinWise::new(42, 64);
///         for v in 0u64..100 + i {
///             mw.push(&v.to_be_bytes());
///         }
///         DomainRecord {
///             key: format!("domain-{i}"),
///             size: 100 + i as usize,
///             signature: mw.into_signature(),
///         }
///     })
///     .collect();
///
/// let query = records[0].signature.clone();
/// let index = EnsembleBuilder::new(2, 64, 4)
///     .unwrap()
///     .build(records)
///     .unwrap();
/// let candidates = index.query(&query, 100, 0.9).unwrap();
/// assert!(candidates.contains(&"domain-0".to_string()));
/// ```
pub struct EnsembleBuilder {
    num_partitions: usize,
    num_hashes: usize,
    max_rows: usize,
    mode: PartitionMode,
    target_threshold: f64,
    shows_progress: bool,
}

impl EnsembleBuilder {
    /// Creates a builder.
    ///
    /// # Arguments
    ///
    /// * `num_partitions` - Number of size partitions (must be at least 1).
    /// * `num_hashes` - Signature length every record must carry (at least 2).
    /// * `max_rows` - Upper bound on rows per band (at least 1, at most
    ///   `num_hashes`).
    pub fn new(num_partitions: usize, num_hashes: usize, max_rows: usize) -> Result<Self> {
        if num_hashes < 2 {
            return Err(EnsembleError::invalid_params(format!(
                "the number of hashes must be at least 2, got {num_hashes}"
            )));
        }
        if num_partitions < 1 {
            return Err(EnsembleError::invalid_params(
                "the number of partitions must be at least 1".to_string(),
            ));
        }
        if max_rows < 1 || max_rows > num_hashes {
            return Err(EnsembleError::invalid_params(format!(
                "max rows per band must be in [1, {num_hashes}], got {max_rows}"
            )));
        }
        Ok(Self {
            num_partitions,
            num_hashes,
            max_rows,
            mode: PartitionMode::default(),
            target_threshold: 0.5,
            shows_progress: false,
        })
    }

    /// Sets the partitioning strategy.
    pub const fn mode(mut self, mode: PartitionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the worst-case containment threshold the index is tuned for.
    /// Each partition's banding parameters are fixed at build time against
    /// this threshold; querying below it degrades recall. Validated at build.
    pub const fn target_threshold(mut self, threshold: f64) -> Self {
        self.target_threshold = threshold;
        self
    }

    /// Shows the progress via the standard error output?
    pub const fn shows_progress(mut self, yes: bool) -> Self {
        self.shows_progress = yes;
        self
    }

    /// Builds the index from records sorted ascending by set size.
    ///
    /// The record source is consumed to completion before partitioning.
    pub fn build<W, K, I>(self, records: I) -> Result<LshEnsemble<W, K>>
    where
        W: HashWord,
        I: IntoIterator<Item = DomainRecord<W, K>>,
    {
        let (records, plans) = self.prepare(records)?;
        let parts = plans
            .iter()
            .enumerate()
            .map(|(i, plan)| {
                let part = self.fill_partition(&records, plan);
                if self.shows_progress {
                    let params = part.table.params();
                    eprintln!(
                        "[EnsembleBuilder::build] partition {}/{}: sizes [{}, {}], bands={}, rows={}",
                        i + 1,
                        plans.len(),
                        part.partition.lower,
                        part.partition.upper,
                        params.bands,
                        params.rows,
                    );
                }
                part
            })
            .collect();
        Ok(self.assemble(records, parts))
    }

    /// Builds the index with the per-partition table fills running in
    /// parallel. The result is identical to [`Self::build`].
    ///
    /// # Notes
    ///
    /// The progress is not printed even if `shows_progress = true`.
    pub fn build_in_parallel<W, K, I>(self, records: I) -> Result<LshEnsemble<W, K>>
    where
        W: HashWord,
        K: Sync,
        I: IntoIterator<Item = DomainRecord<W, K>>,
    {
        let (records, plans) = self.prepare(records)?;
        let parts = plans
            .par_iter()
            .map(|plan| self.fill_partition(&records, plan))
            .collect();
        Ok(self.assemble(records, parts))
    }

    // Consumes the record stream and validates it against the builder
    // configuration, returning the records with their partition plan.
    #[allow(clippy::type_complexity)]
    fn prepare<W, K, I>(
        &self,
        records: I,
    ) -> Result<(Vec<DomainRecord<W, K>>, Vec<(Partition, Range<usize>)>)>
    where
        W: HashWord,
        I: IntoIterator<Item = DomainRecord<W, K>>,
    {
        if !(self.target_threshold > 0. && self.target_threshold <= 1.) {
            return Err(EnsembleError::InvalidThreshold(self.target_threshold));
        }
        let records: Vec<_> = records.into_iter().collect();
        if records.is_empty() {
            return Err(EnsembleError::EmptyInput);
        }
        for r in &records {
            if r.signature.len() != self.num_hashes {
                return Err(EnsembleError::shape_mismatch(
                    self.num_hashes,
                    r.signature.len(),
                ));
            }
        }
        if records.windows(2).any(|w| w[0].size > w[1].size) {
            return Err(EnsembleError::invalid_params(
                "records must be sorted ascending by size".to_string(),
            ));
        }

        let sizes: Vec<usize> = records.iter().map(|r| r.size).collect();
        let plans = match self.mode {
            PartitionMode::EquiDepth => plan_equi_depth(&sizes, self.num_partitions),
            PartitionMode::CostOptimal => plan_cost_optimal(
                &sizes,
                self.num_partitions,
                self.target_threshold,
                self.num_hashes,
                self.max_rows,
            ),
        };
        Ok((records, plans))
    }

    // Chooses the partition's banding parameters at its worst-case size
    // ratio and inserts its records.
    fn fill_partition<W, K>(
        &self,
        records: &[DomainRecord<W, K>],
        (partition, range): &(Partition, Range<usize>),
    ) -> PartitionIndex<W>
    where
        W: HashWord,
    {
        let (params, _, _) = optimal_params(
            partition.upper,
            partition.lower.max(1),
            self.target_threshold,
            self.num_hashes,
            self.max_rows,
        );
        let mut table = LshTable::new(params);
        for slot in range.clone() {
            table.insert(slot as u32, &records[slot].signature);
        }
        PartitionIndex {
            partition: *partition,
            table,
        }
    }

    fn assemble<W, K>(
        self,
        records: Vec<DomainRecord<W, K>>,
        parts: Vec<PartitionIndex<W>>,
    ) -> LshEnsemble<W, K> {
        LshEnsemble {
            num_hashes: self.num_hashes,
            max_rows: self.max_rows,
            target_threshold: self.target_threshold,
            mode: self.mode,
            records,
            parts,
        }
    }
}

pub(crate) struct PartitionIndex<W> {
    pub(crate) partition: Partition,
    pub(crate) table: LshTable<W>,
}

/// A frozen containment-search index over size-partitioned banded LSH tables.
///
/// After build the index is read-only: queries are reentrant and may run
/// concurrently from many threads.
pub struct LshEnsemble<W, K> {
    pub(crate) num_hashes: usize,
    pub(crate) max_rows: usize,
    pub(crate) target_threshold: f64,
    pub(crate) mode: PartitionMode,
    pub(crate) records: Vec<DomainRecord<W, K>>,
    pub(crate) parts: Vec<PartitionIndex<W>>,
}

impl<W: HashWord, K> LshEnsemble<W, K> {
    /// Builds an index with default tuning. Shorthand for
    /// [`EnsembleBuilder::new`] followed by [`EnsembleBuilder::build`].
    pub fn build<I>(
        records: I,
        num_partitions: usize,
        num_hashes: usize,
        max_rows: usize,
        mode: PartitionMode,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = DomainRecord<W, K>>,
    {
        EnsembleBuilder::new(num_partitions, num_hashes, max_rows)?
            .mode(mode)
            .build(records)
    }

    /// Returns the keys of all indexed domains that may contain the query at
    /// the given threshold.
    ///
    /// Candidates are yielded in insertion order, each key at most once; the
    /// order is stable for identical input. An empty query (`q_size == 0`)
    /// yields no candidates.
    pub fn query(&self, signature: &[W], q_size: usize, threshold: f64) -> Result<Vec<K>>
    where
        K: Clone,
    {
        self.validate_query(signature, threshold)?;
        if q_size == 0 {
            return Ok(vec![]);
        }
        let slots = self.probe(signature, None)?;
        Ok(self.keys_of(&slots))
    }

    /// Like [`Self::query`], but re-checks each candidate's containment
    /// estimate from the stored full signatures and keeps only those meeting
    /// the threshold. Costs `O(num_hashes)` per candidate.
    pub fn query_filtered(&self, signature: &[W], q_size: usize, threshold: f64) -> Result<Vec<K>>
    where
        K: Clone,
    {
        self.validate_query(signature, threshold)?;
        if q_size == 0 {
            return Ok(vec![]);
        }
        let mut keys = vec![];
        for &slot in &self.probe(signature, None)? {
            let record = &self.records[slot as usize];
            let estimate = containment(signature, &record.signature, q_size, record.size)?;
            if estimate >= threshold {
                keys.push(record.key.clone());
            }
        }
        Ok(keys)
    }

    /// Like [`Self::query`], plus a monotonic-clock measurement of the probe.
    pub fn query_timed(
        &self,
        signature: &[W],
        q_size: usize,
        threshold: f64,
    ) -> Result<(Vec<K>, Duration)>
    where
        K: Clone,
    {
        self.validate_query(signature, threshold)?;
        let start = Instant::now();
        let keys = if q_size == 0 {
            vec![]
        } else {
            self.keys_of(&self.probe(signature, None)?)
        };
        Ok((keys, start.elapsed()))
    }

    /// Like [`Self::query`], observing a cancellation token at partition
    /// boundaries. A cancelled query produces no partial output and fails
    /// with [`EnsembleError::Cancelled`].
    pub fn query_cancellable(
        &self,
        signature: &[W],
        q_size: usize,
        threshold: f64,
        token: &CancelToken,
    ) -> Result<Vec<K>>
    where
        K: Clone,
    {
        self.validate_query(signature, threshold)?;
        if q_size == 0 {
            return Ok(vec![]);
        }
        let slots = self.probe(signature, Some(token))?;
        Ok(self.keys_of(&slots))
    }

    /// Computes the per-partition Jaccard thresholds equivalent to a
    /// containment threshold for a query of `q_size`, evaluated at each
    /// partition's upper size bound (the conservative choice).
    pub fn jaccard_thresholds(&self, q_size: usize, threshold: f64) -> Result<Vec<f64>> {
        if !(threshold > 0. && threshold <= 1.) {
            return Err(EnsembleError::InvalidThreshold(threshold));
        }
        Ok(self
            .parts
            .iter()
            .map(|p| containment_to_jaccard(threshold, p.partition.upper, q_size))
            .collect())
    }

    /// Gets the number of indexed records.
    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    /// Checks if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Gets the signature length the index was built with.
    pub const fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Gets the ordered partition plan with each partition's banding
    /// parameters.
    pub fn partitions(&self) -> Vec<(Partition, LshParams)> {
        self.parts
            .iter()
            .map(|p| (p.partition, p.table.params()))
            .collect()
    }

    /// Gets the memory usage in bytes of the stored signatures and bucket
    /// maps.
    pub fn memory_in_bytes(&self) -> usize {
        self.records.len() * self.num_hashes * W::BYTES
            + self
                .parts
                .iter()
                .map(|p| p.table.memory_in_bytes())
                .sum::<usize>()
    }

    fn validate_query(&self, signature: &[W], threshold: f64) -> Result<()> {
        if !(threshold > 0. && threshold <= 1.) {
            return Err(EnsembleError::InvalidThreshold(threshold));
        }
        if signature.len() != self.num_hashes {
            return Err(EnsembleError::shape_mismatch(
                self.num_hashes,
                signature.len(),
            ));
        }
        Ok(())
    }

    // Probes every partition's table, deduplicating slots across partitions.
    // The partition plan forbids cross-listing, so the dedupe is defensive.
    fn probe(&self, signature: &[W], token: Option<&CancelToken>) -> Result<Vec<u32>> {
        let mut seen = HashSet::new();
        for part in &self.parts {
            if token.is_some_and(CancelToken::is_cancelled) {
                return Err(EnsembleError::Cancelled);
            }
            part.table.probe(signature, &mut seen);
        }
        let mut slots: Vec<u32> = seen.into_iter().collect();
        slots.sort_unstable();
        Ok(slots)
    }

    fn keys_of(&self, slots: &[u32]) -> Vec<K>
    where
        K: Clone,
    {
        slots
            .iter()
            .map(|&slot| self.records[slot as usize].key.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::sort_by_size;
    use minsketch::MinWise;

    const SEED: u64 = 42;

    fn signature_of(values: impl Iterator<Item = u64>, num_hashes: usize) -> Vec<u64> {
        let mut mw = MinWise::<u64>::new(SEED, num_hashes);
        for v in values {
            mw.push(&v.to_be_bytes());
        }
        mw.into_signature()
    }

    fn record(key: &str, values: std::ops::Range<u64>, num_hashes: usize) -> DomainRecord<u64, String> {
        DomainRecord {
            key: key.to_string(),
            size: (values.end - values.start) as usize,
            signature: signature_of(values, num_hashes),
        }
    }

    fn three_domain_index(num_hashes: usize) -> LshEnsemble<u64, String> {
        let mut records = vec![
            record("a", 1..101, num_hashes),
            record("b", 50..151, num_hashes),
            record("c", 200..301, num_hashes),
        ];
        sort_by_size(&mut records);
        EnsembleBuilder::new(2, num_hashes, 4)
            .unwrap()
            .build(records)
            .unwrap()
    }

    #[test]
    fn test_high_containment_domain_always_returned() {
        let index = three_domain_index(256);
        // The query is almost all of domain a.
        let sig = signature_of(1..96, 256);
        let results = index.query(&sig, 95, 0.9).unwrap();
        assert!(results.contains(&"a".to_string()));
    }

    #[test]
    fn test_filtered_query_drops_disjoint_domain() {
        let index = three_domain_index(256);
        let sig = signature_of(1..96, 256);
        let results = index.query_filtered(&sig, 95, 0.5).unwrap();
        assert!(results.contains(&"a".to_string()));
        assert!(!results.contains(&"c".to_string()));
    }

    #[test]
    fn test_exact_self_query() {
        let records = vec![record("a", 1..1001, 128)];
        let sig = records[0].signature.clone();
        let index = EnsembleBuilder::new(1, 128, 4).unwrap().build(records).unwrap();
        let results = index.query(&sig, 1000, 1.0).unwrap();
        assert_eq!(results, ["a".to_string()]);
        let results = index.query_filtered(&sig, 1000, 1.0).unwrap();
        assert_eq!(results, ["a".to_string()]);
    }

    #[test]
    fn test_empty_query_yields_nothing() {
        let index = three_domain_index(128);
        let sig = signature_of(1..101, 128);
        assert!(index.query(&sig, 0, 0.5).unwrap().is_empty());
        assert!(index.query_filtered(&sig, 0, 0.5).unwrap().is_empty());
    }

    #[test]
    fn test_signature_length_mismatch() {
        let index = three_domain_index(128);
        let sig = signature_of(1..101, 64);
        assert!(matches!(
            index.query(&sig, 100, 0.5),
            Err(EnsembleError::ShapeMismatch {
                expected: 128,
                actual: 64
            })
        ));
    }

    #[test]
    fn test_invalid_threshold() {
        let index = three_domain_index(128);
        let sig = signature_of(1..101, 128);
        for t in [0., -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                index.query(&sig, 100, t),
                Err(EnsembleError::InvalidThreshold(_))
            ));
        }
    }

    #[test]
    fn test_build_empty_input() {
        let records: Vec<DomainRecord<u64, String>> = vec![];
        assert!(matches!(
            EnsembleBuilder::new(2, 128, 4).unwrap().build(records),
            Err(EnsembleError::EmptyInput)
        ));
    }

    #[test]
    fn test_build_unsorted_records() {
        let records = vec![record("b", 50..151, 128), record("a", 1..101, 128)];
        assert!(matches!(
            EnsembleBuilder::new(2, 128, 4).unwrap().build(records),
            Err(EnsembleError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_build_signature_mismatch() {
        let records = vec![record("a", 1..101, 128), record("b", 50..151, 64)];
        assert!(matches!(
            EnsembleBuilder::new(2, 128, 4).unwrap().build(records),
            Err(EnsembleError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_builder_params() {
        assert!(EnsembleBuilder::new(0, 128, 4).is_err());
        assert!(EnsembleBuilder::new(2, 1, 1).is_err());
        assert!(EnsembleBuilder::new(2, 128, 0).is_err());
        assert!(EnsembleBuilder::new(2, 128, 129).is_err());
    }

    #[test]
    fn test_invalid_target_threshold() {
        let records = vec![record("a", 1..101, 128)];
        assert!(matches!(
            EnsembleBuilder::new(1, 128, 4)
                .unwrap()
                .target_threshold(0.)
                .build(records),
            Err(EnsembleError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_no_duplicate_keys() {
        let num_hashes = 128;
        let mut records: Vec<_> = (0u64..50)
            .map(|i| record(&format!("d{i}"), 0..100 + i, num_hashes))
            .collect();
        sort_by_size(&mut records);
        let index = EnsembleBuilder::new(4, num_hashes, 4)
            .unwrap()
            .build(records)
            .unwrap();
        let sig = signature_of(0..100, num_hashes);
        let results = index.query(&sig, 100, 0.5).unwrap();
        let unique: HashSet<_> = results.iter().collect();
        assert_eq!(unique.len(), results.len());
    }

    #[test]
    fn test_query_deterministic() {
        let index = three_domain_index(128);
        let sig = signature_of(1..101, 128);
        let a = index.query(&sig, 100, 0.5).unwrap();
        let b = index.query(&sig, 100, 0.5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let num_hashes = 128;
        let mut records: Vec<_> = (0u64..40)
            .map(|i| record(&format!("d{i}"), i..i + 120, num_hashes))
            .collect();
        sort_by_size(&mut records);

        let sequential = EnsembleBuilder::new(4, num_hashes, 4)
            .unwrap()
            .build(records.clone())
            .unwrap();
        let parallel = EnsembleBuilder::new(4, num_hashes, 4)
            .unwrap()
            .build_in_parallel(records)
            .unwrap();

        assert_eq!(sequential.partitions(), parallel.partitions());
        let sig = signature_of(0..120, num_hashes);
        assert_eq!(
            sequential.query(&sig, 120, 0.5).unwrap(),
            parallel.query(&sig, 120, 0.5).unwrap()
        );
    }

    #[test]
    fn test_concurrent_queries_match_sequential() {
        let index = three_domain_index(128);
        let sig = signature_of(1..101, 128);
        let expected = index.query(&sig, 100, 0.5).unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| index.query(&sig, 100, 0.5).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn test_cancellation() {
        let index = three_domain_index(128);
        let sig = signature_of(1..101, 128);

        let token = CancelToken::new();
        assert!(index.query_cancellable(&sig, 100, 0.5, &token).is_ok());

        token.cancel();
        assert!(matches!(
            index.query_cancellable(&sig, 100, 0.5, &token),
            Err(EnsembleError::Cancelled)
        ));
    }

    #[test]
    fn test_query_timed_matches_query() {
        let index = three_domain_index(128);
        let sig = signature_of(1..101, 128);
        let plain = index.query(&sig, 100, 0.5).unwrap();
        let (timed, _duration) = index.query_timed(&sig, 100, 0.5).unwrap();
        assert_eq!(plain, timed);
    }

    #[test]
    fn test_partition_coverage() {
        let num_hashes = 64;
        let mut records: Vec<_> = (0u64..100)
            .map(|i| record(&format!("d{i}"), 0..50 + i * 3, num_hashes))
            .collect();
        sort_by_size(&mut records);
        let sizes: Vec<_> = records.iter().map(|r| r.size).collect();
        let index =
            LshEnsemble::build(records, 8, num_hashes, 4, PartitionMode::EquiDepth).unwrap();

        let partitions = index.partitions();
        for w in partitions.windows(2) {
            assert!(w[0].0.upper < w[1].0.lower);
        }
        for size in sizes {
            let holding = partitions
                .iter()
                .filter(|(p, _)| p.lower <= size && size <= p.upper)
                .count();
            assert_eq!(holding, 1, "size {size} not covered exactly once");
        }
        for (_, params) in partitions {
            assert!(params.bands * params.rows <= num_hashes);
            assert!(params.rows <= 4);
        }
    }

    #[test]
    fn test_jaccard_thresholds_conservative() {
        let index = three_domain_index(128);
        let thresholds = index.jaccard_thresholds(100, 0.8).unwrap();
        assert_eq!(thresholds.len(), index.partitions().len());
        // Larger upper bounds give smaller equivalent Jaccard thresholds.
        for w in thresholds.windows(2) {
            assert!(w[0] >= w[1]);
        }
        assert!(thresholds.iter().all(|&j| (0. ..=1.).contains(&j)));
    }

    #[test]
    fn test_recall_on_synthetic_catalog() {
        let num_hashes = 256;
        let query_values = 0u64..100;

        // 100 noise domains disjoint from the query, then 100 domains fully
        // containing it.
        let mut records: Vec<_> = (0..100u64)
            .map(|i| {
                record(
                    &format!("noise-{i}"),
                    100_000 + i * 200..100_000 + i * 200 + 100,
                    num_hashes,
                )
            })
            .collect();
        for i in 0..100u64 {
            let mut mw = MinWise::<u64>::new(SEED, num_hashes);
            for v in query_values.clone() {
                mw.push(&v.to_be_bytes());
            }
            for v in 1000 + i * 10..1000 + i * 10 + 10 {
                mw.push(&v.to_be_bytes());
            }
            records.push(DomainRecord {
                key: format!("true-{i}"),
                size: 110,
                signature: mw.into_signature(),
            });
        }
        sort_by_size(&mut records);

        let index = EnsembleBuilder::new(4, num_hashes, 4)
            .unwrap()
            .build(records)
            .unwrap();
        let sig = signature_of(query_values, num_hashes);

        let results = index.query(&sig, 100, 0.5).unwrap();
        let found = results.iter().filter(|k| k.starts_with("true-")).count();
        assert!(
            found >= 95,
            "recall {found}/100 below bound for fully containing domains"
        );

        // The filtered variant keeps the true domains and drops the noise.
        let filtered = index.query_filtered(&sig, 100, 0.5).unwrap();
        assert!(filtered.iter().all(|k| k.starts_with("true-")));
        let kept = filtered.iter().filter(|k| k.starts_with("true-")).count();
        assert!(kept >= 95);
    }

    #[test]
    fn test_cost_optimal_build_and_query() {
        let num_hashes = 128;
        let mut records: Vec<_> = (0u64..30)
            .map(|i| record(&format!("d{i}"), 0..100 + i * 20, num_hashes))
            .collect();
        sort_by_size(&mut records);
        let index = EnsembleBuilder::new(4, num_hashes, 4)
            .unwrap()
            .mode(PartitionMode::CostOptimal)
            .build(records)
            .unwrap();

        // d0 is a prefix of every domain; querying it must return it.
        let sig = signature_of(0..100, num_hashes);
        let results = index.query(&sig, 100, 0.5).unwrap();
        assert!(results.contains(&"d0".to_string()));
        let partitions = index.partitions();
        assert!(!partitions.is_empty() && partitions.len() <= 4);
    }

    #[test]
    fn test_memory_in_bytes_nonzero() {
        let index = three_domain_index(64);
        assert!(index.memory_in_bytes() >= 3 * 64 * 8);
    }
}
