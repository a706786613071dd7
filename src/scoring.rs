// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring model: per-match score and per-partition combined score.

/// Exponent applied to relevance in [`match_score`]. Exposed as a constant
/// rather than a parameter since the spec fixes it at 1.0 by default and
/// nothing downstream varies it per call.
pub const ALPHA: f64 = 1.0;

/// Score assigned to an unmatched group in a partition: small and
/// positive so the geometric mean is well-defined (zero would collapse
/// the whole partition's score to zero regardless of how well the other
/// groups matched).
pub const EPSILON_MATCH_SCORE: f64 = 1e-6;

const _: () = assert!(EPSILON_MATCH_SCORE > 0.0 && EPSILON_MATCH_SCORE < 1e-3);

/// `match_score(m) = p * (1 - d/(a+1)) * r^alpha`. Always in `[0, 1]` given
/// `p in (0,1]`, `r in [0,1]`, and `d <= a`, but callers may pass
/// already-clamped-but-float-noisy inputs, so the result is clamped
/// defensively rather than trusted to fall in range by construction.
pub fn match_score(page_rank: f64, edit_distance: u32, edit_allowance: u32, relevance: f64) -> f64 {
    let d = f64::from(edit_distance);
    let a = f64::from(edit_allowance);
    let edit_penalty = 1.0 - d / (a + 1.0);
    let score = page_rank * edit_penalty * relevance.powf(ALPHA);
    score.clamp(0.0, 1.0)
}

/// One group's contribution to a partition's combined score: either its
/// best match's [`match_score`] and character length, or the unmatched
/// fallback.
#[derive(Debug, Clone, Copy)]
pub struct GroupOutcome {
    pub score: f64,
    pub matched: bool,
    pub char_len: usize,
}

impl GroupOutcome {
    pub fn matched(score: f64, char_len: usize) -> Self {
        GroupOutcome { score, matched: true, char_len }
    }

    pub fn unmatched(char_len: usize) -> Self {
        GroupOutcome {
            score: EPSILON_MATCH_SCORE,
            matched: false,
            char_len,
        }
    }
}

/// `partition_score(P) = (prod match_score(Mi))^(1/k) * coverage(P)`.
/// `total_chars` is the phrase's full character count (the coverage
/// denominator); unmatched groups still count toward it, they just don't
/// contribute to the numerator.
pub fn partition_score(outcomes: &[GroupOutcome], total_chars: usize) -> f64 {
    if outcomes.is_empty() || total_chars == 0 {
        return 0.0;
    }

    let k = outcomes.len() as f64;
    let product: f64 = outcomes.iter().map(|o| o.score).product();
    let geometric_mean = product.powf(1.0 / k);

    let matched_chars: usize = outcomes.iter().filter(|o| o.matched).map(|o| o.char_len).sum();
    let coverage = matched_chars as f64 / total_chars as f64;

    (geometric_mean * coverage).clamp(0.0, 1.0)
}

/// Optimistic upper bound on a partial partition's score, used by the
/// selector to prune: assumes every group not yet scored would score a
/// perfect 1.0 and that coverage reaches the theoretical max for the
/// groups already known to be matched or unmatched.
pub fn optimistic_upper_bound(known: &[GroupOutcome], remaining_groups: usize, total_chars: usize) -> f64 {
    if total_chars == 0 {
        return 0.0;
    }
    let k = (known.len() + remaining_groups) as f64;
    if k == 0.0 {
        return 0.0;
    }
    let known_product: f64 = known.iter().map(|o| o.score).product();
    // Remaining groups assumed to score a perfect 1.0 each.
    let geometric_mean = known_product.powf(1.0 / k);
    // Only chars already known to be unmatched are lost; remaining groups
    // are optimistically assumed to cover every char not yet accounted for.
    let known_unmatched_chars: usize = known.iter().filter(|o| !o.matched).map(|o| o.char_len).sum();
    let coverage_upper_bound = 1.0 - (known_unmatched_chars as f64 / total_chars as f64);
    (geometric_mean * coverage_upper_bound).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_score_is_in_unit_range() {
        for d in 0..=3u32 {
            for a in d..=5u32 {
                let score = match_score(0.7, d, a, 0.8);
                assert!((0.0..=1.0).contains(&score), "score {score} out of range for d={d} a={a}");
            }
        }
    }

    #[test]
    fn match_score_monotone_in_page_rank() {
        let low = match_score(0.2, 1, 2, 0.9);
        let high = match_score(0.8, 1, 2, 0.9);
        assert!(high >= low);
    }

    #[test]
    fn match_score_monotone_in_edit_distance() {
        let closer = match_score(0.5, 0, 3, 0.9);
        let farther = match_score(0.5, 2, 3, 0.9);
        assert!(closer >= farther);
    }

    #[test]
    fn exact_match_scores_to_page_rank_times_relevance() {
        let score = match_score(0.6, 0, 3, 1.0);
        assert!((score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn unmatched_groups_contribute_epsilon_not_zero() {
        let outcome = GroupOutcome::unmatched(5);
        assert_eq!(outcome.score, EPSILON_MATCH_SCORE);
        assert!(outcome.score > 0.0);
    }

    #[test]
    fn full_coverage_partition_scores_higher_than_partial_coverage() {
        let full = [GroupOutcome::matched(0.8, 10)];
        let partial = [GroupOutcome::matched(0.8, 5), GroupOutcome::unmatched(5)];
        assert!(partition_score(&full, 10) > partition_score(&partial, 10));
    }

    #[test]
    fn partition_score_is_in_unit_range() {
        let outcomes = [GroupOutcome::matched(0.9, 3), GroupOutcome::matched(0.4, 4), GroupOutcome::unmatched(2)];
        let score = partition_score(&outcomes, 9);
        assert!((0.0..=1.0).contains(&score));
    }
}
