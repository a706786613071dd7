// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Builds a full-text [`crate::store::Store`] from a set of POR records.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::{ResolverError, Result};
use crate::index::document::{build_terms, IndexDocument};
use crate::store::Store;
use crate::transliterate::Transliterator;
use crate::types::PorRecord;

/// Builds an in-memory store from `records`, assigning dense document ids
/// in input order. Does not touch disk - callers that need a persisted
/// index use [`build_index_to_directory`].
pub fn build_index(records: Vec<PorRecord>) -> Store {
    let transliterator = Transliterator::new();
    let mut store = Store::with_capacity(records.len());

    for record in records {
        let doc_id = store.next_doc_id();
        let terms = build_terms(&record, &transliterator);
        let weight = record.page_rank;
        store.add_document(IndexDocument { doc_id, terms, weight }, record);
    }

    info!("built index: {} documents, {} terms", store.doc_count(), store.term_count());
    store
}

/// Builds an in-memory store the same way as [`build_index`], but computes
/// each record's term set across a rayon thread pool and merges postings
/// under a shared lock, with an indicatif progress bar so a large catalog
/// build doesn't look hung. Only compiled with the `parallel` feature.
#[cfg(feature = "parallel")]
pub fn build_index_parallel(records: Vec<PorRecord>) -> Store {
    use std::collections::HashMap;

    use indicatif::{ProgressBar, ProgressStyle};
    use parking_lot::Mutex;
    use rayon::prelude::*;

    use crate::types::DocId;

    let pb = ProgressBar::new(records.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len}") {
        pb.set_style(style.progress_chars("##-"));
    }
    pb.set_prefix("Indexing");

    let postings: Mutex<HashMap<String, Vec<DocId>>> = Mutex::new(HashMap::new());

    let rows: Vec<(Vec<String>, f64, PorRecord)> = records
        .into_par_iter()
        .enumerate()
        .map(|(i, record)| {
            let doc_id = i as DocId;
            let terms = build_terms(&record, &Transliterator::new());

            {
                let mut postings = postings.lock();
                for term in &terms {
                    postings.entry(term.clone()).or_default().push(doc_id);
                }
            }
            pb.inc(1);
            (terms, record.page_rank, record)
        })
        .collect();

    pb.finish_with_message("index built");

    let mut doc_terms = Vec::with_capacity(rows.len());
    let mut doc_weights = Vec::with_capacity(rows.len());
    let mut doc_records = Vec::with_capacity(rows.len());
    for (terms, weight, record) in rows {
        doc_terms.push(terms);
        doc_weights.push(weight);
        doc_records.push(record);
    }

    let store = Store::from_parts(postings.into_inner(), doc_terms, doc_weights, doc_records);
    info!("built index in parallel: {} documents, {} terms", store.doc_count(), store.term_count());
    store
}

#[cfg(feature = "parallel")]
fn build_store(records: Vec<PorRecord>) -> Store {
    build_index_parallel(records)
}

#[cfg(not(feature = "parallel"))]
fn build_store(records: Vec<PorRecord>) -> Store {
    build_index(records)
}

/// Builds the index and persists it to `dir`. The builder always starts
/// from a fresh directory: an existing one is removed and recreated so a
/// partially-written prior build can never be mistaken for a complete one.
pub fn build_index_to_directory(records: Vec<PorRecord>, dir: &Path) -> Result<Store> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| ResolverError::IndexBuildError(format!("clearing {}: {e}", dir.display())))?;
    }
    fs::create_dir_all(dir).map_err(|e| ResolverError::IndexBuildError(format!("creating {}: {e}", dir.display())))?;

    let store = build_store(records);
    store
        .save(dir)
        .map_err(|e| ResolverError::IndexBuildError(format!("writing index to {}: {e}", dir.display())))?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PorKey, PorKind};

    fn record(iata: &str) -> PorRecord {
        PorRecord {
            key: PorKey {
                iata_code: iata.into(),
                icao_code: String::new(),
                geonames_id: 0,
            },
            kind: PorKind::Airport,
            primary_names: vec![crate::types::LocalizedName {
                lang: "local".into(),
                text: iata.to_string(),
            }],
            alternate_names: vec![],
            serving_cities: vec![],
            country_code: String::new(),
            adm1_code: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            date_from: None,
            date_until: None,
            page_rank: 0.5,
        }
    }

    #[test]
    fn assigns_dense_doc_ids() {
        let store = build_index(vec![record("CDG"), record("MUC")]);
        assert_eq!(store.doc_count(), 2);
    }

    #[test]
    fn build_to_directory_recreates_existing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let index_dir = tmp.path().join("idx");
        fs::create_dir_all(&index_dir).unwrap();
        fs::write(index_dir.join("stale.marker"), b"old").unwrap();

        build_index_to_directory(vec![record("CDG")], &index_dir).unwrap();
        assert!(!index_dir.join("stale.marker").exists());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_build_matches_sequential_build() {
        let records: Vec<PorRecord> = (0..50).map(|i| record(&format!("A{i:02}"))).collect();
        let sequential = build_index(records.clone());
        let parallel = build_index_parallel(records);

        assert_eq!(sequential.doc_count(), parallel.doc_count());
        assert_eq!(sequential.term_count(), parallel.term_count());
        for doc_id in 0..sequential.doc_count() as u32 {
            assert_eq!(sequential.record(doc_id).unwrap().key.iata_code, parallel.record(doc_id).unwrap().key.iata_code);
            assert_eq!(sequential.weight(doc_id), parallel.weight(doc_id));
        }
    }
}
