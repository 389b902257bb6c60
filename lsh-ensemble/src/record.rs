//! Indexed domain records.

/// A sketched domain: an opaque key, the cardinality of the original set, and
/// its MinWise signature.
///
/// All records fed into one index must carry signatures of the same length
/// and seed; length is checked at insertion, the seed is the caller's
/// responsibility.
#[derive(Clone, Debug)]
pub struct DomainRecord<W, K> {
    /// Opaque identifier returned by queries.
    pub key: K,
    /// Cardinality of the original set, not the signature length.
    pub size: usize,
    /// MinWise signature of the set.
    pub signature: Vec<W>,
}

/// Sorts records ascending by set size, preserving the relative order of
/// equal sizes.
pub fn sort_by_size<W, K>(records: &mut [DomainRecord<W, K>]) {
    records.sort_by_key(|r| r.size);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_size_stable() {
        let mut records: Vec<DomainRecord<u64, &str>> = vec![
            DomainRecord { key: "c", size: 30, signature: vec![] },
            DomainRecord { key: "a1", size: 10, signature: vec![] },
            DomainRecord { key: "b", size: 20, signature: vec![] },
            DomainRecord { key: "a2", size: 10, signature: vec![] },
        ];
        sort_by_size(&mut records);
        let keys: Vec<_> = records.iter().map(|r| r.key).collect();
        assert_eq!(keys, ["a1", "a2", "b", "c"]);
    }
}
