use proptest::prelude::*;
use quickcheck::quickcheck;

use clats::{partition_bounds, CandidateSource, Dictionary};

quickcheck! {
    fn bounds_cover_everything_in_order(total: u32, parts: u8) -> bool {
        let total = u64::from(total % 100_000);
        let parts = usize::from(parts % 64) + 1;
        let ranges = partition_bounds(total, parts);
        if ranges.len() != parts {
            return false;
        }
        let mut next = 0;
        for r in &ranges {
            if r.start != next || r.end < r.start {
                return false;
            }
            next = r.end;
        }
        next == total
    }

    fn sizes_differ_by_at_most_one(total: u32, parts: u8) -> bool {
        let total = u64::from(total % 100_000);
        let parts = usize::from(parts % 64) + 1;
        let sizes: Vec<u64> = partition_bounds(total, parts)
            .iter()
            .map(|r| r.end - r.start)
            .collect();
        let max = sizes.iter().copied().max().unwrap_or(0);
        let min = sizes.iter().copied().min().unwrap_or(0);
        // Larger ranges come first.
        max - min <= 1 && sizes.windows(2).all(|w| w[0] >= w[1])
    }
}

proptest! {
    #[test]
    fn dictionary_partitions_concatenate(
        words in prop::collection::vec("[a-z]{1,6}", 0..200),
        workers in 1usize..40,
    ) {
        let source = CandidateSource::from(Dictionary::from_words(&words));
        let whole: Vec<String> = source.iter().map(|c| c.into_owned()).collect();
        let parts = source.partition(workers);
        prop_assert_eq!(parts.len(), workers);
        let total: u64 = parts.iter().map(|p| p.len()).sum();
        prop_assert_eq!(total, source.size());
        let joined: Vec<String> = parts
            .iter()
            .flat_map(|p| p.iter().map(|c| c.into_owned()).collect::<Vec<_>>())
            .collect();
        prop_assert_eq!(joined, whole);
    }
}
