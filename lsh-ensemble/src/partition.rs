//! Partitioning of size-sorted records.
//!
//! Containment is asymmetric in the domain size, so one LSH table cannot
//! bound error rates uniformly across a catalog. The planner cuts the
//! size-sorted records into contiguous partitions; each partition gets its
//! own table tuned to its size range.
use std::ops::Range;

use crate::params::optimal_params;

/// A contiguous, inclusive size range of indexed domains sharing one LSH
/// table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    /// Smallest domain size in the partition.
    pub lower: usize,
    /// Largest domain size in the partition.
    pub upper: usize,
}

/// Partitioning strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PartitionMode {
    /// Cut into groups of equal record count. Deterministic and linear.
    #[default]
    EquiDepth,
    /// Choose cut points minimising the summed false-positive and
    /// false-negative probability at the build target threshold.
    /// Experimental; quadratic in the number of distinct sizes.
    CostOptimal,
}

// Cost-optimal planning thins its boundary candidates to this many cuts so
// the quadratic DP stays tractable on large catalogs.
const MAX_BOUNDARIES: usize = 64;

/// Cuts size-sorted records into at most `num_partitions` contiguous groups
/// of near-equal count. Cuts are pushed past runs of equal sizes so that a
/// size value never straddles two partitions.
pub(crate) fn plan_equi_depth(
    sizes: &[usize],
    num_partitions: usize,
) -> Vec<(Partition, Range<usize>)> {
    let n = sizes.len();
    let depth = n.div_ceil(num_partitions);
    let mut plans = vec![];
    let mut start = 0;
    while start < n {
        let mut end = (start + depth).min(n);
        while end < n && sizes[end] == sizes[end - 1] {
            end += 1;
        }
        plans.push((
            Partition {
                lower: sizes[start],
                upper: sizes[end - 1],
            },
            start..end,
        ));
        start = end;
    }
    plans
}

/// Chooses cut points by dynamic programming over distinct-size boundaries,
/// minimising the summed per-partition error probability at
/// `target_threshold`. Each candidate partition is costed by its optimal
/// `(bands, rows)` at the worst-case in-partition size ratio.
pub(crate) fn plan_cost_optimal(
    sizes: &[usize],
    num_partitions: usize,
    target_threshold: f64,
    num_hashes: usize,
    max_rows: usize,
) -> Vec<(Partition, Range<usize>)> {
    let n = sizes.len();
    // Candidate cuts sit between runs of equal sizes.
    let mut bounds = vec![0];
    for i in 1..n {
        if sizes[i] != sizes[i - 1] {
            bounds.push(i);
        }
    }
    bounds.push(n);
    if bounds.len() > MAX_BOUNDARIES {
        bounds = thin_boundaries(bounds, MAX_BOUNDARIES);
    }
    let segments = bounds.len() - 1;
    let parts = num_partitions.min(segments);

    // Per-pair error probabilities, computed once: cost[i][j] spans segments
    // i..j at the worst-case in-partition size ratio.
    let mut cost = vec![vec![0.; segments + 1]; segments];
    for (i, row) in cost.iter_mut().enumerate() {
        for (j, slot) in row.iter_mut().enumerate().skip(i + 1) {
            let lower = sizes[bounds[i]].max(1);
            let upper = sizes[bounds[j] - 1];
            let (_, fp, fn_) = optimal_params(upper, lower, target_threshold, num_hashes, max_rows);
            *slot = fp + fn_;
        }
    }

    // dp[p][m]: best cost covering the first m segments with p+1 partitions.
    let mut dp = vec![vec![f64::MAX; segments + 1]; parts];
    let mut parent = vec![vec![0usize; segments + 1]; parts];
    for m in 1..=segments {
        dp[0][m] = cost[0][m];
    }
    for p in 1..parts {
        for m in (p + 1)..=segments {
            for i in p..m {
                if dp[p - 1][i] == f64::MAX {
                    continue;
                }
                let c = dp[p - 1][i] + cost[i][m];
                if c < dp[p][m] {
                    dp[p][m] = c;
                    parent[p][m] = i;
                }
            }
        }
    }

    let mut cuts = vec![segments];
    let mut m = segments;
    for p in (1..parts).rev() {
        m = parent[p][m];
        cuts.push(m);
    }
    cuts.push(0);
    cuts.reverse();

    cuts.windows(2)
        .map(|w| {
            let (start, end) = (bounds[w[0]], bounds[w[1]]);
            (
                Partition {
                    lower: sizes[start],
                    upper: sizes[end - 1],
                },
                start..end,
            )
        })
        .collect()
}

fn thin_boundaries(bounds: Vec<usize>, limit: usize) -> Vec<usize> {
    let stride = bounds.len().div_ceil(limit);
    let last = *bounds.last().unwrap();
    let mut thinned: Vec<usize> = bounds.into_iter().step_by(stride).collect();
    if *thinned.last().unwrap() != last {
        thinned.push(last);
    }
    thinned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covering(plans: &[(Partition, Range<usize>)], sizes: &[usize]) {
        // Every record in exactly one partition, ranges contiguous.
        let mut next = 0;
        for (part, range) in plans {
            assert_eq!(range.start, next);
            assert!(range.start < range.end);
            assert_eq!(part.lower, sizes[range.start]);
            assert_eq!(part.upper, sizes[range.end - 1]);
            next = range.end;
        }
        assert_eq!(next, sizes.len());
        // Ranges ordered and strictly disjoint.
        for w in plans.windows(2) {
            assert!(w[0].0.upper < w[1].0.lower);
        }
    }

    #[test]
    fn test_equi_depth_even_split() {
        let sizes: Vec<usize> = (1..=100).collect();
        let plans = plan_equi_depth(&sizes, 4);
        assert_eq!(plans.len(), 4);
        assert_covering(&plans, &sizes);
        assert_eq!(plans[0].1, 0..25);
    }

    #[test]
    fn test_equi_depth_equal_sizes_do_not_straddle() {
        let sizes = vec![1, 2, 5, 5, 5, 5, 5, 9, 10, 11];
        let plans = plan_equi_depth(&sizes, 5);
        assert_covering(&plans, &sizes);
        // All the 5s must land in one partition.
        let holding = plans
            .iter()
            .filter(|(p, _)| p.lower <= 5 && 5 <= p.upper)
            .count();
        assert_eq!(holding, 1);
    }

    #[test]
    fn test_equi_depth_single_size() {
        let sizes = vec![7; 20];
        let plans = plan_equi_depth(&sizes, 4);
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].0, Partition { lower: 7, upper: 7 });
        assert_eq!(plans[0].1, 0..20);
    }

    #[test]
    fn test_equi_depth_more_partitions_than_records() {
        let sizes = vec![3, 8];
        let plans = plan_equi_depth(&sizes, 10);
        assert_eq!(plans.len(), 2);
        assert_covering(&plans, &sizes);
    }

    #[test]
    fn test_cost_optimal_covering() {
        let sizes: Vec<usize> = (1..=30).flat_map(|s| [s * 10, s * 10]).collect();
        let plans = plan_cost_optimal(&sizes, 4, 0.5, 64, 4);
        assert_eq!(plans.len(), 4);
        assert_covering(&plans, &sizes);
    }

    #[test]
    fn test_cost_optimal_fewer_distinct_sizes_than_partitions() {
        let sizes = vec![10, 10, 20, 20, 30];
        let plans = plan_cost_optimal(&sizes, 8, 0.5, 64, 4);
        assert_eq!(plans.len(), 3);
        assert_covering(&plans, &sizes);
    }

    #[test]
    fn test_cost_optimal_prefers_narrow_ranges() {
        // A catalog of two well-separated size clusters should be cut at the
        // gap rather than inside a cluster.
        let mut sizes = vec![10; 50];
        sizes.extend([11; 50]);
        sizes.extend([10_000; 50]);
        sizes.extend([10_001; 50]);
        let plans = plan_cost_optimal(&sizes, 2, 0.5, 64, 4);
        assert_covering(&plans, &sizes);
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].0.upper, 11);
        assert_eq!(plans[1].0.lower, 10_000);
    }
}
