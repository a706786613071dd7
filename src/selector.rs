// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Selector: enumerates partitions, matches each group, scores each
//! partition, and returns the winning one plus its unmatched groups.
//! Per §4.6 the coarsest partition that fully matches (every group finds a
//! candidate) wins outright over any finer one, even a higher-scoring one -
//! finer partitions are only in contention when no coarser partition fully
//! matches.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::matcher::{MatchCandidate, Matcher};
use crate::partition::enumerate_partitions;
use crate::scoring::{match_score, optimistic_upper_bound, partition_score, GroupOutcome};
use crate::store::Store;
use crate::types::{Match, Partition, QueryPhrase};

type Candidate = (Partition, Vec<Option<MatchCandidate>>, Vec<GroupOutcome>);

/// Result of one selection pass, before POR records are resolved from the
/// store (that's [`crate::resolver::Resolver::interpret`]'s job, so this
/// type stays a thin carrier of doc ids rather than duplicating records).
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub matches: Vec<Match>,
    pub unmatched: Vec<String>,
    pub score: f64,
    pub partial: bool,
}

pub struct Selector<'a> {
    store: &'a Store,
    matcher: Matcher<'a>,
}

impl<'a> Selector<'a> {
    pub fn new(store: &'a Store) -> Self {
        Selector { store, matcher: Matcher::new(store) }
    }

    pub fn select(&self, phrase: &QueryPhrase, max_edit: Option<u32>, top_k: usize, deadline: Duration) -> Selection {
        let n = phrase.len();
        if n == 0 {
            return Selection::default();
        }

        let total_chars = phrase.reconstruct().chars().count();
        let partitions = enumerate_partitions(n);
        let started = Instant::now();

        // Pruning compares a partition against the best score seen so far
        // within its own group-count tier only: §4.6 prefers a coarser
        // partition over a finer one whenever the coarser one also fully
        // matches, regardless of which one scores higher, so a finer
        // partition's score can never be used to discard a coarser one.
        let mut tier_best_score: HashMap<usize, f64> = HashMap::new();
        let mut tier_best_full: HashMap<usize, (f64, Candidate)> = HashMap::new();
        let mut fallback_score = -1.0_f64;
        let mut fallback: Option<Candidate> = None;
        let mut partial = false;

        for partition in partitions {
            if started.elapsed() >= deadline {
                partial = true;
                break;
            }

            let group_count = partition.group_count();
            let tier_score = tier_best_score.get(&group_count).copied().unwrap_or(-1.0);

            let mut candidates: Vec<Option<MatchCandidate>> = Vec::with_capacity(group_count);
            let mut outcomes: Vec<GroupOutcome> = Vec::with_capacity(group_count);
            let mut pruned = false;

            for (idx, group) in partition.groups.iter().enumerate() {
                let text = phrase.group_text(group);
                let char_len = text.chars().count();
                let hits = self.matcher.match_phrase(&text, max_edit, top_k);
                let best_hit = hits.into_iter().next();

                let outcome = match &best_hit {
                    Some(c) => {
                        let page_rank = self.store.weight(c.doc_id);
                        let s = match_score(page_rank, c.edit_distance, c.edit_allowance, c.relevance);
                        GroupOutcome::matched(s, char_len)
                    }
                    None => GroupOutcome::unmatched(char_len),
                };
                outcomes.push(outcome);
                candidates.push(best_hit);

                let remaining = group_count - idx - 1;
                if remaining > 0 {
                    let upper = optimistic_upper_bound(&outcomes, remaining, total_chars);
                    if upper <= tier_score {
                        pruned = true;
                        break;
                    }
                }
            }

            if pruned {
                continue;
            }

            let score = partition_score(&outcomes, total_chars);
            let fully_matched = outcomes.iter().all(|o| o.matched);

            if score > tier_score {
                tier_best_score.insert(group_count, score);
            }
            if fully_matched {
                let current = tier_best_full.get(&group_count).map(|(s, _)| *s).unwrap_or(-1.0);
                if score > current {
                    tier_best_full.insert(group_count, (score, (partition.clone(), candidates.clone(), outcomes.clone())));
                }
            }
            if score > fallback_score {
                fallback_score = score;
                fallback = Some((partition, candidates, outcomes));
            }
        }

        // Coarsest fully-matched tier wins outright; only when no tier
        // fully matches do we fall back to the best score seen anywhere.
        let chosen = tier_best_full
            .into_iter()
            .min_by_key(|(group_count, _)| *group_count)
            .map(|(_, (score, candidate))| (score, candidate));

        let (best_score, best) = match chosen {
            Some((score, candidate)) => (score, Some(candidate)),
            None => (fallback_score, fallback),
        };

        let Some((partition, candidates, outcomes)) = best else {
            return Selection {
                matches: Vec::new(),
                unmatched: vec![phrase.reconstruct()],
                score: 0.0,
                partial,
            };
        };

        let mut matches = Vec::new();
        let mut unmatched = Vec::new();
        for ((group, candidate), outcome) in partition.groups.iter().zip(candidates).zip(outcomes) {
            if outcome.matched {
                let c = candidate.expect("matched outcome always carries a candidate");
                matches.push(Match {
                    group: group.clone(),
                    doc_id: c.doc_id,
                    relevance: c.relevance,
                    edit_distance: c.edit_distance,
                    edit_allowance: c.edit_allowance,
                    page_rank: self.store.weight(c.doc_id),
                });
            } else {
                unmatched.push(phrase.group_text(group));
            }
        }

        Selection {
            matches,
            unmatched,
            score: best_score.max(0.0),
            partial,
        }
    }
}
