//! First-writer-wins and union properties of the accumulator.

use proptest::prelude::*;
use std::collections::BTreeMap;
use xmlrec_schema::SchemaAccumulator;
use xmlrec_types::FileType;

fn arb_file() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-e]", "[0-9]{1,3}"), 0..6)
}

proptest! {
    #[test]
    fn samples_are_first_observed_values(files in prop::collection::vec(arb_file(), 1..6)) {
        let ft = FileType::new("T");
        let mut acc = SchemaAccumulator::new();
        let mut expected: BTreeMap<String, String> = BTreeMap::new();
        for file in &files {
            acc.absorb(&ft, file.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            for (k, v) in file {
                expected.entry(k.clone()).or_insert_with(|| v.clone());
            }
        }

        let entries = acc.into_entries();
        prop_assert_eq!(entries.len(), 1);
        let got: BTreeMap<String, String> = entries[0]
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn merging_halves_equals_sequential(files in prop::collection::vec(arb_file(), 2..6), split in 1usize..5) {
        let ft = FileType::new("T");
        let split = split.min(files.len() - 1);

        let mut sequential = SchemaAccumulator::new();
        for file in &files {
            sequential.absorb(&ft, file.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        let mut left = SchemaAccumulator::new();
        let mut right = SchemaAccumulator::new();
        for file in &files[..split] {
            left.absorb(&ft, file.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        for file in &files[split..] {
            right.absorb(&ft, file.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        left.merge(right);

        prop_assert_eq!(left.into_entries(), sequential.into_entries());
    }
}
