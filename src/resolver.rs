// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The resolver call surface: `interpret(phrase) -> (matches, unmatched,
//! partial)`, plus the build/open entry points that get a [`Store`] ready
//! for it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;

use crate::catalog::load_catalog;
use crate::error::{ResolverError, Result};
use crate::index::builder::build_index_to_directory;
use crate::pagerank::{load_pagerank_table, PageRankTable};
use crate::scoring::match_score;
use crate::selector::Selector;
use crate::store::Store;
use crate::transliterate::Transliterator;
use crate::types::{QueryPhrase, ResolvedMatch, ResultBundle};

/// Construction parameters for a [`Resolver`]. Defaults mirror the
/// original implementation's `BasConst` file-path conventions and spec
/// §6's call-surface defaults.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub max_edit: Option<u32>,
    pub top_k: usize,
    pub deadline: Duration,
}

impl ResolverConfig {
    pub const DEFAULT_TOP_K: usize = 20;
    pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(2);
    pub const DEFAULT_POR_FILENAME: &'static str = "por.csv";
    pub const DEFAULT_PAGERANK_FILENAME: &'static str = "pagerank.csv";
    pub const DEFAULT_INDEX_DIRNAME: &'static str = "trep_index";
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            max_edit: None,
            top_k: Self::DEFAULT_TOP_K,
            deadline: Self::DEFAULT_DEADLINE,
        }
    }
}

/// Owns the built full-text store (and, incidentally, the POR records) for
/// the lifetime of however many `interpret` calls the caller makes. All
/// per-call state (candidate lists, score maps) lives on the stack of
/// [`Resolver::interpret`], not here, so concurrent calls over a shared
/// `&Resolver` need no synchronization.
pub struct Resolver {
    store: Store,
    transliterator: Transliterator,
}

impl Resolver {
    /// Builds a fresh index from a POR catalog and PageRank table and
    /// persists it to `index_dir`.
    pub fn build(catalog_path: &Path, pagerank_path: &Path, index_dir: &Path) -> Result<Resolver> {
        let mut records = load_catalog(catalog_path)?;
        let table = load_pagerank_table(pagerank_path);
        apply_pagerank(&mut records, &table);

        let store = build_index_to_directory(records, index_dir)?;
        Ok(Resolver {
            store,
            transliterator: Transliterator::new(),
        })
    }

    /// Opens a previously built index directory read-only.
    pub fn open(index_dir: &Path) -> Result<Resolver> {
        let store = Store::load(index_dir)
            .map_err(|e| ResolverError::MatcherIndexUnavailable(format!("{}: {e}", index_dir.display())))?
            .ok_or_else(|| ResolverError::MatcherIndexUnavailable(format!("{}: unrecognized index format", index_dir.display())))?;
        Ok(Resolver {
            store,
            transliterator: Transliterator::new(),
        })
    }

    pub fn doc_count(&self) -> usize {
        self.store.doc_count()
    }

    /// `interpret(phrase, *, max_edit, top_k, deadline) -> (matches,
    /// unmatched, partial)`. Never returns an error for an empty phrase:
    /// per spec §7 `InvalidQuery` surfaces as an empty bundle with
    /// `partial = false`, not a propagated error.
    pub fn interpret(&self, phrase: &str, config: &ResolverConfig) -> ResultBundle {
        let transliterated = self.transliterator.transliterate(phrase);
        let query = QueryPhrase::tokenize(&transliterated);

        if query.is_empty() {
            debug!("phrase {phrase:?} empty after transliteration");
            return ResultBundle {
                matches: Vec::new(),
                unmatched: Vec::new(),
                score: 0.0,
                partial: false,
            };
        }

        let selector = Selector::new(&self.store);
        let selection = selector.select(&query, config.max_edit, config.top_k, config.deadline);

        let mut matches = Vec::with_capacity(selection.matches.len());
        for m in &selection.matches {
            let Some(record) = self.store.record(m.doc_id) else {
                continue;
            };
            let score = match_score(m.page_rank, m.edit_distance, m.edit_allowance, m.relevance);
            matches.push(ResolvedMatch {
                record: record.clone(),
                relevance: m.relevance,
                edit_distance: m.edit_distance,
                score,
            });
        }

        ResultBundle {
            matches,
            unmatched: selection.unmatched,
            score: selection.score,
            partial: selection.partial,
        }
    }

    /// Default catalog/PageRank/index paths under `base_dir`, mirroring
    /// the original's `BasConst_OPENTREP_Service` file-path conventions.
    pub fn default_paths(base_dir: &Path) -> (PathBuf, PathBuf, PathBuf) {
        (
            base_dir.join(ResolverConfig::DEFAULT_POR_FILENAME),
            base_dir.join(ResolverConfig::DEFAULT_PAGERANK_FILENAME),
            base_dir.join(ResolverConfig::DEFAULT_INDEX_DIRNAME),
        )
    }
}

fn apply_pagerank(records: &mut [crate::types::PorRecord], table: &PageRankTable) {
    for record in records.iter_mut() {
        record.page_rank = table.lookup_with_kind(&record.key.iata_code, record.kind.code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_catalog(dir: &Path) -> PathBuf {
        let path = dir.join("por.csv");
        let content = [
            "iata_code^icao_code^geoname_id^latitude^longitude^loc_type^name^asciiname^alternatenames^country_code^adm1_code^date_from^date_until^city_code_list",
            "CDG^LFPG^6269554^49.0097^2.5478^A^Aéroport Charles de Gaulle^Charles de Gaulle Airport^^FR^11^^^PAR",
            "RIO^SBGL^3451190^-22.81^-43.25^A^Rio de Janeiro^Rio de Janeiro^^BR^RJ^^^RIO",
            "SFO^KSFO^5391959^37.6213^-122.379^A^San Francisco^San Francisco^^US^CA^^^SFO",
        ]
        .join("\n");
        std::fs::File::create(&path).unwrap().write_all(content.as_bytes()).unwrap();
        path
    }

    fn write_pagerank(dir: &Path) -> PathBuf {
        let path = dir.join("pagerank.csv");
        std::fs::write(&path, "CDG,100\nRIO,60\nSFO,80\n").unwrap();
        path
    }

    #[test]
    fn exact_iata_code_resolves_one_match() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = write_catalog(dir.path());
        let pagerank = write_pagerank(dir.path());
        let index_dir = dir.path().join("idx");

        let resolver = Resolver::build(&catalog, &pagerank, &index_dir).unwrap();
        let bundle = resolver.interpret("cdg", &ResolverConfig::default());

        assert_eq!(bundle.matches.len(), 1);
        assert_eq!(bundle.matches[0].record.key.iata_code, "CDG");
        assert!(bundle.unmatched.is_empty());
        assert!(!bundle.partial);
        assert!(bundle.score >= 0.9);
    }

    #[test]
    fn two_cities_in_one_query_outscores_single_group_partition() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = write_catalog(dir.path());
        let pagerank = write_pagerank(dir.path());
        let index_dir = dir.path().join("idx");

        let resolver = Resolver::build(&catalog, &pagerank, &index_dir).unwrap();
        let bundle = resolver.interpret("san francicso rio de janero", &ResolverConfig::default());

        let codes: Vec<&str> = bundle.matches.iter().map(|m| m.record.key.iata_code.as_str()).collect();
        assert!(codes.contains(&"SFO"));
        assert!(codes.contains(&"RIO"));
    }

    #[test]
    fn empty_after_transliteration_returns_empty_bundle_no_error() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = write_catalog(dir.path());
        let pagerank = write_pagerank(dir.path());
        let index_dir = dir.path().join("idx");

        let resolver = Resolver::build(&catalog, &pagerank, &index_dir).unwrap();
        let bundle = resolver.interpret("---", &ResolverConfig::default());

        assert!(bundle.matches.is_empty());
        assert!(bundle.unmatched.is_empty());
        assert!(!bundle.partial);
    }

    #[test]
    fn opening_a_missing_index_fails_with_matcher_unavailable() {
        let err = Resolver::open(Path::new("/nonexistent/idx")).unwrap_err();
        assert!(matches!(err, ResolverError::MatcherIndexUnavailable(_)));
    }

    #[test]
    fn built_index_can_be_reopened() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = write_catalog(dir.path());
        let pagerank = write_pagerank(dir.path());
        let index_dir = dir.path().join("idx");

        let built = Resolver::build(&catalog, &pagerank, &index_dir).unwrap();
        let reopened = Resolver::open(&index_dir).unwrap();
        assert_eq!(built.doc_count(), reopened.doc_count());
    }
}
