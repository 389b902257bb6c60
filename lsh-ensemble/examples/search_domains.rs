use lsh_ensemble::{sort_by_size, DomainRecord, EnsembleBuilder};
use minsketch::MinWise;

fn main() {
    // A tiny catalog of integer domains.
    let domains: Vec<(&str, Vec<u64>)> = vec![
        ("small", (0..100).collect()),
        ("medium", (0..500).collect()),
        ("large", (0..2000).collect()),
        ("other", (10_000..12_000).collect()),
    ];

    // Sketches every domain into a 256-position MinWise signature (with
    // random seed value 42).
    let mut records: Vec<DomainRecord<u64, String>> = domains
        .iter()
        .map(|(key, values)| {
            let mut mw = MinWise::<u64>::new(42, 256);
            for v in values {
                mw.push(&v.to_be_bytes());
            }
            DomainRecord {
                key: key.to_string(),
                size: values.len(),
                signature: mw.into_signature(),
            }
        })
        .collect();
    sort_by_size(&mut records);

    // Builds an index of two size partitions.
    let index = EnsembleBuilder::new(2, 256, 4)
        .unwrap()
        .shows_progress(true)
        .build(records)
        .unwrap();

    // Searches for domains containing at least 90% of [0, 100).
    let mut query = MinWise::<u64>::new(42, 256);
    for v in 0u64..100 {
        query.push(&v.to_be_bytes());
    }
    let results = index
        .query_filtered(query.signature(), 100, 0.9)
        .unwrap();

    // Every domain built from a prefix of [0, 2000) contains the query.
    println!("{results:?}");
    assert!(results.contains(&"small".to_string()));
    assert!(!results.contains(&"other".to_string()));
}
