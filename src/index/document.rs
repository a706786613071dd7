// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! One indexable document per POR record: its term set and weight.

use crate::transliterate::Transliterator;
use crate::types::{DocId, PorRecord};

/// A document ready to be added to the full-text store. `terms` is closed
/// under the transliterator: every term is already in transliterated
/// (accent-folded, lowercase, Latin-script) form.
#[derive(Debug, Clone)]
pub struct IndexDocument {
    pub doc_id: DocId,
    pub terms: Vec<String>,
    pub weight: f64,
}

/// Builds the term set for one record: full transliterated name variants,
/// their whitespace-split words, the lowercased IATA/ICAO codes, and the
/// serving cities' codes and names - all through the same transliterator
/// used at query time, so the index stays closed under §4.1.
pub fn build_terms(record: &PorRecord, transliterator: &Transliterator) -> Vec<String> {
    let mut terms = Vec::new();

    let mut add_name = |raw: &str| {
        if raw.is_empty() {
            return;
        }
        let full = transliterator.transliterate(raw);
        if full.is_empty() {
            return;
        }
        for word in full.split_whitespace() {
            terms.push(word.to_string());
        }
        terms.push(full);
    };

    for name in &record.primary_names {
        add_name(&name.text);
    }
    for name in &record.alternate_names {
        add_name(&name.text);
    }

    if !record.key.iata_code.is_empty() {
        terms.push(record.key.iata_code.to_lowercase());
    }
    if !record.key.icao_code.is_empty() {
        terms.push(record.key.icao_code.to_lowercase());
    }

    for city in &record.serving_cities {
        if !city.key.iata_code.is_empty() {
            terms.push(city.key.iata_code.to_lowercase());
        }
        for name in &city.names {
            add_name(&name.text);
        }
    }

    terms.sort();
    terms.dedup();
    terms
}
