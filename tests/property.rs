//! Property-based checks for the invariants the specification calls out
//! explicitly: transliteration idempotence, tokenize/reconstruct
//! round-tripping, match-score boundedness, and partition-enumeration
//! exhaustiveness.

use std::collections::HashSet;

use proptest::prelude::*;

use opentrep_resolver::{partition, scoring, transliterate};

proptest! {
    /// Invariant 1: transliterator idempotence.
    #[test]
    fn transliteration_is_idempotent(s in "\\PC{0,40}") {
        let t = transliterate::Transliterator::new();
        let once = t.transliterate(&s);
        let twice = t.transliterate(&once);
        prop_assert_eq!(once, twice);
    }

    /// Invariant 6: matched + unmatched groups, in order, reconstruct
    /// the tokenized phrase.
    #[test]
    fn tokenize_reconstruct_round_trips(words in prop::collection::vec("[a-z]{1,8}", 1..6)) {
        let joined = words.join(" ");
        let phrase = opentrep_resolver::types::QueryPhrase::tokenize(&joined);
        prop_assert_eq!(phrase.reconstruct(), joined);
    }

    /// Invariant 2: match_score stays in [0, 1] for any valid inputs.
    #[test]
    fn match_score_always_in_unit_range(
        page_rank in 0.001f64..1.0,
        edit_distance in 0u32..4,
        extra_allowance in 0u32..4,
        relevance in 0.0f64..1.0,
    ) {
        let allowance = edit_distance + extra_allowance;
        let score = scoring::match_score(page_rank, edit_distance, allowance, relevance);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    /// Invariant 5: partition enumeration is exhaustive and
    /// non-repeating for any word count.
    #[test]
    fn partition_count_is_exactly_two_pow_n_minus_one(n in 1usize..8) {
        let partitions = partition::enumerate_partitions(n);
        prop_assert_eq!(partitions.len(), 1usize << (n - 1));
        let unique: HashSet<_> = partitions.iter().map(|p| format!("{:?}", p.groups)).collect();
        prop_assert_eq!(unique.len(), partitions.len());
    }
}
