// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The full-text index and POR record store. Opaque to the core per spec:
//! callers only rely on add-document-with-weight, boolean AND/OR querying,
//! retrieval by id, and reader concurrency - all satisfied here by a plain
//! in-memory inverted index behind shared references, since immutable data
//! behind `&Store` is trivially safe for many concurrent readers with no
//! locking once the (single, build-time) writer has finished.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::index::document::IndexDocument;
use crate::types::{DocId, PorRecord};

const PERSIST_MAGIC: &[u8; 4] = b"TREP";
const PERSIST_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedStore {
    doc_terms: Vec<Vec<String>>,
    doc_weights: Vec<f64>,
    doc_records: Vec<PorRecord>,
}

/// In-memory full-text index plus the POR records it was built from.
#[derive(Debug, Clone, Default)]
pub struct Store {
    postings: HashMap<String, Vec<DocId>>,
    doc_terms: Vec<Vec<String>>,
    doc_weights: Vec<f64>,
    doc_records: Vec<PorRecord>,
}

impl Store {
    pub fn with_capacity(n: usize) -> Self {
        Store {
            postings: HashMap::new(),
            doc_terms: Vec::with_capacity(n),
            doc_weights: Vec::with_capacity(n),
            doc_records: Vec::with_capacity(n),
        }
    }

    /// Assembles a store from an already-merged postings map plus
    /// per-document data, all indexed by doc id. Used by the parallel
    /// builder, which computes postings under a shared lock across worker
    /// threads instead of through sequential [`Store::add_document`] calls.
    pub(crate) fn from_parts(
        postings: HashMap<String, Vec<DocId>>,
        doc_terms: Vec<Vec<String>>,
        doc_weights: Vec<f64>,
        doc_records: Vec<PorRecord>,
    ) -> Self {
        Store {
            postings,
            doc_terms,
            doc_weights,
            doc_records,
        }
    }

    /// The id the next [`Store::add_document`] call will assign.
    pub fn next_doc_id(&self) -> DocId {
        self.doc_terms.len() as DocId
    }

    /// Adds a document. `doc.doc_id` must equal [`Store::next_doc_id`] at
    /// call time - ids are dense and assigned in insertion order.
    pub fn add_document(&mut self, doc: IndexDocument, record: PorRecord) {
        debug_assert_eq!(doc.doc_id, self.next_doc_id());
        for term in &doc.terms {
            self.postings.entry(term.clone()).or_default().push(doc.doc_id);
        }
        self.doc_terms.push(doc.terms);
        self.doc_weights.push(doc.weight);
        self.doc_records.push(record);
    }

    pub fn doc_count(&self) -> usize {
        self.doc_terms.len()
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn record(&self, doc_id: DocId) -> Option<&PorRecord> {
        self.doc_records.get(doc_id as usize)
    }

    pub fn weight(&self, doc_id: DocId) -> f64 {
        self.doc_weights.get(doc_id as usize).copied().unwrap_or(0.0)
    }

    pub fn terms_for_doc(&self, doc_id: DocId) -> &[String] {
        self.doc_terms.get(doc_id as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Documents containing every term in `terms` (boolean AND). Empty
    /// `terms` yields no documents, matching "no constraints satisfied by
    /// definition" rather than "everything matches".
    pub fn query_and(&self, terms: &[String]) -> Vec<DocId> {
        if terms.is_empty() {
            return Vec::new();
        }
        let mut postings: Vec<&Vec<DocId>> = Vec::with_capacity(terms.len());
        for term in terms {
            match self.postings.get(term) {
                Some(p) => postings.push(p),
                None => return Vec::new(),
            }
        }
        postings.sort_by_key(|p| p.len());
        let mut result: Vec<DocId> = postings[0].clone();
        for p in &postings[1..] {
            let set: std::collections::HashSet<DocId> = p.iter().copied().collect();
            result.retain(|d| set.contains(d));
            if result.is_empty() {
                break;
            }
        }
        result.sort_unstable();
        result.dedup();
        result
    }

    /// Documents containing at least one term in `terms` (boolean OR).
    pub fn query_or(&self, terms: &[String]) -> Vec<DocId> {
        let mut result = std::collections::HashSet::new();
        for term in terms {
            if let Some(postings) = self.postings.get(term) {
                result.extend(postings.iter().copied());
            }
        }
        let mut result: Vec<DocId> = result.into_iter().collect();
        result.sort_unstable();
        result
    }

    /// Persists the store to `dir/index.trep`, a versioned JSON dump.
    /// Compact and inspectable rather than a bespoke binary layout: the
    /// index format is explicitly opaque to the core (spec §6), only
    /// result-bundle serialization (`serialize.rs`) is a defined wire
    /// contract.
    pub fn save(&self, dir: &Path) -> std::io::Result<()> {
        let persisted = PersistedStore {
            doc_terms: self.doc_terms.clone(),
            doc_weights: self.doc_weights.clone(),
            doc_records: self.doc_records.clone(),
        };
        let body = serde_json::to_vec(&persisted).map_err(std::io::Error::other)?;
        let mut out = Vec::with_capacity(body.len() + 5);
        out.extend_from_slice(PERSIST_MAGIC);
        out.push(PERSIST_VERSION);
        out.extend_from_slice(&body);
        fs::write(dir.join("index.trep"), out)
    }

    /// Loads a store previously written by [`Store::save`]. Returns `None`
    /// (not an error) if the magic/version header doesn't match, so the
    /// caller can surface `MatcherIndexUnavailable` with its own context.
    pub fn load(dir: &Path) -> std::io::Result<Option<Store>> {
        let bytes = fs::read(dir.join("index.trep"))?;
        if bytes.len() < 5 || &bytes[0..4] != PERSIST_MAGIC || bytes[4] != PERSIST_VERSION {
            return Ok(None);
        }
        let persisted: PersistedStore = match serde_json::from_slice(&bytes[5..]) {
            Ok(p) => p,
            Err(_) => return Ok(None),
        };

        let mut store = Store::with_capacity(persisted.doc_records.len());
        for ((terms, weight), record) in persisted
            .doc_terms
            .into_iter()
            .zip(persisted.doc_weights)
            .zip(persisted.doc_records)
        {
            let doc_id = store.next_doc_id();
            store.add_document(IndexDocument { doc_id, terms, weight }, record);
        }
        Ok(Some(store))
    }
}
