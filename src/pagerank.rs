// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! PageRank table: POR key -> normalized popularity weight in (0, 1].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::warn;

use crate::types::PorKey;

/// Weight assigned to a key absent from the table. `lookup` never returns
/// a value `<= 0`.
pub const FLOOR_WEIGHT: f64 = 1e-3;

/// A read-only in-memory map from POR key to normalized weight, built once
/// at load time and shared across resolver calls.
#[derive(Debug, Clone, Default)]
pub struct PageRankTable {
    weights: HashMap<String, f64>,
}

impl PageRankTable {
    /// Normalizes `key` the same way the table's own keys are normalized:
    /// bare IATA code, or `IATA-KIND`.
    pub fn lookup(&self, key: &PorKey) -> f64 {
        if !key.iata_code.is_empty() {
            if let Some(&w) = self.weights.get(&key.iata_code) {
                return w;
            }
        }
        FLOOR_WEIGHT
    }

    /// Same as [`PageRankTable::lookup`] but for a `(iata, kind)` pair key,
    /// used when the table disambiguates by kind (e.g. a city and an
    /// airport sharing an IATA code).
    pub fn lookup_with_kind(&self, iata_code: &str, kind_code: char) -> f64 {
        let composite = format!("{iata_code}-{kind_code}");
        if let Some(&w) = self.weights.get(&composite) {
            return w;
        }
        if let Some(&w) = self.weights.get(iata_code) {
            return w;
        }
        FLOOR_WEIGHT
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }
}

/// Loads and normalizes the PageRank table. Malformed lines are skipped
/// with a warning rather than failing the whole load: `PageRankFormatError`
/// is non-fatal, callers get floor weights for any key the table couldn't
/// supply.
pub fn load_pagerank_table(path: &Path) -> PageRankTable {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("PageRank table {} not readable ({e}); using floor weights for all keys", path.display());
            return PageRankTable::default();
        }
    };

    let mut raw: HashMap<String, f64> = HashMap::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, weight_raw)) = line.split_once(',') else {
            warn!("PageRank table line {} malformed (no comma): {line:?}", idx + 1);
            continue;
        };
        let Ok(weight) = weight_raw.trim().parse::<f64>() else {
            warn!("PageRank table line {} has non-numeric weight: {line:?}", idx + 1);
            continue;
        };
        if weight <= 0.0 {
            warn!("PageRank table line {} has non-positive weight, skipped: {line:?}", idx + 1);
            continue;
        }
        raw.insert(key.trim().to_string(), weight);
    }

    let max = raw.values().copied().fold(0.0_f64, f64::max);
    let weights = if max > 0.0 {
        raw.into_iter().map(|(k, v)| (k, v / max)).collect()
    } else {
        raw
    };

    PageRankTable { weights }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_by_max_weight() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pr.csv");
        fs::write(&path, "CDG,100\nMUC-C,50\n").unwrap();

        let table = load_pagerank_table(&path);
        assert_eq!(table.len(), 2);
        let cdg = table.lookup(&PorKey {
            iata_code: "CDG".into(),
            icao_code: String::new(),
            geonames_id: 0,
        });
        assert!((cdg - 1.0).abs() < 1e-9);
        assert!((table.lookup_with_kind("MUC", 'C') - 0.5).abs() < 1e-9);
    }

    #[test]
    fn absent_key_returns_floor() {
        let table = PageRankTable::default();
        let weight = table.lookup(&PorKey {
            iata_code: "ZZZ".into(),
            icao_code: String::new(),
            geonames_id: 0,
        });
        assert_eq!(weight, FLOOR_WEIGHT);
        assert!(weight > 0.0);
    }

    #[test]
    fn unreadable_file_yields_empty_table_not_error() {
        let table = load_pagerank_table(Path::new("/nonexistent/pr.csv"));
        assert!(table.is_empty());
    }

    #[test]
    fn skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pr.csv");
        fs::write(&path, "CDG,100\nbroken-line\nMUC,oops\n").unwrap();
        let table = load_pagerank_table(&path);
        assert_eq!(table.len(), 1);
    }
}
