// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Full-text matcher: given a phrase, returns ranked candidate POR
//! document ids with per-candidate relevance and edit distance.

use crate::fuzzy::{default_max_edit, edit_distance, neighbors_within};
use crate::store::Store;
use crate::transliterate::Transliterator;
use crate::types::DocId;

/// One candidate returned by [`Matcher::match_phrase`], before scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub doc_id: DocId,
    pub relevance: f64,
    pub edit_distance: u32,
    pub edit_allowance: u32,
}

pub struct Matcher<'a> {
    store: &'a Store,
    transliterator: Transliterator,
}

impl<'a> Matcher<'a> {
    pub fn new(store: &'a Store) -> Self {
        Matcher {
            store,
            transliterator: Transliterator::new(),
        }
    }

    /// `match(phrase, max_edit) -> list of (doc_id, relevance, edit)`
    /// ordered by descending relevance, ties broken by descending document
    /// weight, then ascending edit distance, then ascending doc id.
    pub fn match_phrase(&self, phrase: &str, max_edit: Option<u32>, top_k: usize) -> Vec<MatchCandidate> {
        let transliterated = self.transliterator.transliterate(phrase);
        let words: Vec<String> = transliterated.split_whitespace().map(str::to_string).collect();
        if words.is_empty() {
            return Vec::new();
        }

        let allowance = max_edit.unwrap_or_else(|| default_max_edit(transliterated.chars().count()));

        let mut candidates = self.match_exact(&words, &transliterated, allowance);
        if candidates.is_empty() {
            candidates = self.match_fuzzy(&words, &transliterated, allowance);
        }

        self.sort_and_truncate(&mut candidates, top_k);
        candidates
    }

    /// Step 2: exact AND match on the transliterated words.
    fn match_exact(&self, words: &[String], joined: &str, allowance: u32) -> Vec<MatchCandidate> {
        let doc_ids = self.store.query_and(words);
        if doc_ids.is_empty() {
            return Vec::new();
        }

        let raw: Vec<(DocId, f64)> = doc_ids
            .into_iter()
            .map(|doc_id| {
                let has_full_phrase = self.store.terms_for_doc(doc_id).iter().any(|t| t == joined);
                let score = if has_full_phrase { 1.0 } else { 0.9 };
                (doc_id, score)
            })
            .collect();
        let max_raw = raw.iter().map(|(_, s)| *s).fold(0.0_f64, f64::max);

        raw.into_iter()
            .map(|(doc_id, raw_score)| MatchCandidate {
                doc_id,
                relevance: if max_raw > 0.0 { raw_score / max_raw } else { 0.0 },
                edit_distance: 0,
                edit_allowance: allowance,
            })
            .collect()
    }

    /// Step 3: single/double-edit neighbor generation, OR-query the index,
    /// then verify each hit's true distance and keep only those within
    /// `allowance`.
    fn match_fuzzy(&self, words: &[String], joined: &str, allowance: u32) -> Vec<MatchCandidate> {
        if allowance == 0 {
            return Vec::new();
        }

        let mut neighbor_terms = Vec::new();
        for word in words {
            neighbor_terms.extend(neighbors_within(word, allowance));
        }
        neighbor_terms.sort();
        neighbor_terms.dedup();

        let doc_ids = self.store.query_or(&neighbor_terms);
        let mut candidates = Vec::new();
        for doc_id in doc_ids {
            let best_distance = self
                .store
                .terms_for_doc(doc_id)
                .iter()
                .map(|term| edit_distance(joined, term))
                .min()
                .unwrap_or(u32::MAX);

            if best_distance <= allowance {
                let relevance = 1.0 - (best_distance as f64) / ((allowance + 1) as f64);
                candidates.push(MatchCandidate {
                    doc_id,
                    relevance,
                    edit_distance: best_distance,
                    edit_allowance: allowance,
                });
            }
        }
        candidates
    }

    fn sort_and_truncate(&self, candidates: &mut Vec<MatchCandidate>, top_k: usize) {
        let store = self.store;
        candidates.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| store.weight(b.doc_id).partial_cmp(&store.weight(a.doc_id)).unwrap_or(std::cmp::Ordering::Equal))
                .then_with(|| a.edit_distance.cmp(&b.edit_distance))
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        candidates.truncate(top_k);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::document::IndexDocument;
    use crate::types::{LocalizedName, PorKey, PorKind, PorRecord};

    fn store_with(entries: &[(&str, &str, f64)]) -> Store {
        let mut store = Store::with_capacity(entries.len());
        for (iata, name, weight) in entries {
            let record = PorRecord {
                key: PorKey {
                    iata_code: (*iata).into(),
                    icao_code: String::new(),
                    geonames_id: 0,
                },
                kind: PorKind::Airport,
                primary_names: vec![LocalizedName {
                    lang: "local".into(),
                    text: (*name).into(),
                }],
                alternate_names: vec![],
                serving_cities: vec![],
                country_code: String::new(),
                adm1_code: String::new(),
                latitude: 0.0,
                longitude: 0.0,
                date_from: None,
                date_until: None,
                page_rank: *weight,
            };
            let terms = crate::index::document::build_terms(&record, &Transliterator::new());
            let doc_id = store.next_doc_id();
            store.add_document(IndexDocument { doc_id, terms, weight: *weight }, record);
        }
        store
    }

    #[test]
    fn exact_code_match_has_zero_edit_distance() {
        let store = store_with(&[("CDG", "Charles de Gaulle", 1.0)]);
        let matcher = Matcher::new(&store);
        let hits = matcher.match_phrase("cdg", None, 20);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].edit_distance, 0);
        assert!((hits[0].relevance - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fuzzy_match_recovers_single_typo() {
        let store = store_with(&[("RIO", "Rio de Janeiro", 1.0)]);
        let matcher = Matcher::new(&store);
        let hits = matcher.match_phrase("rio de janero", Some(1), 20);
        assert!(!hits.is_empty());
        assert!(hits.iter().any(|h| store.record(h.doc_id).unwrap().key.iata_code == "RIO"));
    }

    #[test]
    fn no_match_returns_empty() {
        let store = store_with(&[("CDG", "Charles de Gaulle", 1.0)]);
        let matcher = Matcher::new(&store);
        assert!(matcher.match_phrase("zzzznotathing", Some(0), 20).is_empty());
    }

    #[test]
    fn higher_weight_breaks_relevance_ties() {
        let store = store_with(&[("AAA", "Same Name", 0.2), ("BBB", "Same Name", 0.9)]);
        let matcher = Matcher::new(&store);
        let hits = matcher.match_phrase("same name", None, 20);
        assert_eq!(hits[0].doc_id, 1, "doc with higher page rank weight should sort first on a relevance tie");
    }
}
