// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Domain types shared by catalog ingestion, index building, and the
//! resolver: POR records, the tokenized query phrase, partitions of that
//! phrase, per-group matches, and the result bundle returned to callers.

use std::fmt;
use std::ops::Range;

/// The kind of point of reference, one letter per variant in the on-disk
/// formats (catalog `loc_type`, PageRank table key suffix).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PorKind {
    Airport,
    Rail,
    Bus,
    Ferry,
    Heliport,
    OffPoint,
    City,
}

impl PorKind {
    /// Single-letter code used in the PageRank table (`IATA-kind`) and the
    /// POR catalog's `loc_type` column.
    pub fn code(self) -> char {
        match self {
            PorKind::Airport => 'A',
            PorKind::Rail => 'R',
            PorKind::Bus => 'B',
            PorKind::Ferry => 'P',
            PorKind::Heliport => 'H',
            PorKind::OffPoint => 'O',
            PorKind::City => 'C',
        }
    }

    pub fn from_code(c: char) -> Option<Self> {
        Some(match c.to_ascii_uppercase() {
            'A' => PorKind::Airport,
            'R' => PorKind::Rail,
            'B' => PorKind::Bus,
            'P' => PorKind::Ferry,
            'H' => PorKind::Heliport,
            'O' => PorKind::OffPoint,
            'C' => PorKind::City,
            _ => return None,
        })
    }
}

/// Uniquely identifies a POR: the triple (IATA code, ICAO code,
/// GeonamesID). An empty string means "absent" for the codes; `0` means
/// "absent" for the Geonames id. Display form and equality follow the
/// original implementation's `PlaceKey`: `iata-icao-geonames_id`, all
/// three fields compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PorKey {
    pub iata_code: String,
    pub icao_code: String,
    pub geonames_id: u64,
}

impl PorKey {
    /// At least one of IATA code or Geonames id must be set.
    pub fn is_valid(&self) -> bool {
        !self.iata_code.is_empty() || self.geonames_id != 0
    }
}

impl fmt::Display for PorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.iata_code, self.icao_code, self.geonames_id)
    }
}

/// A name in one language, already in raw (pre-transliteration) form as it
/// appeared in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LocalizedName {
    pub lang: String,
    pub text: String,
}

/// A serving-city reference: the city's own key plus whatever names the
/// catalog carried for it inline (not a separate lookup into the full POR
/// set - resolving that, if ever needed, is the caller's job).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CityRef {
    pub key: PorKey,
    pub names: Vec<LocalizedName>,
}

/// One POR record, immutable after ingestion.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PorRecord {
    pub key: PorKey,
    pub kind: PorKind,
    pub primary_names: Vec<LocalizedName>,
    pub alternate_names: Vec<LocalizedName>,
    pub serving_cities: Vec<CityRef>,
    pub country_code: String,
    pub adm1_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub date_from: Option<String>,
    pub date_until: Option<String>,
    /// Strictly positive; floor-assigned when the key is absent from the
    /// PageRank table.
    pub page_rank: f64,
}

/// Dense integer id assigned to a [`PorRecord`] by the index builder.
/// Stable for the lifetime of one built index, not across rebuilds.
pub type DocId = u32;

/// An ordered sequence of words produced by whitespace tokenization of a
/// transliterated string. Empty words are discarded during tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryPhrase {
    pub words: Vec<String>,
}

impl QueryPhrase {
    /// Splits an already-transliterated string on whitespace, discarding
    /// empty words.
    pub fn tokenize(transliterated: &str) -> Self {
        QueryPhrase {
            words: transliterated
                .split_whitespace()
                .map(str::to_string)
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Inverse of [`QueryPhrase::tokenize`] for a whole phrase: joins the
    /// words back with single spaces. Used by the coverage-identity
    /// property (matched groups + unmatched groups, in order,
    /// reconstructs this string).
    pub fn reconstruct(&self) -> String {
        self.words.join(" ")
    }

    /// The words covered by `range`, joined with a single space.
    pub fn group_text(&self, range: &Range<usize>) -> String {
        self.words[range.clone()].join(" ")
    }
}

/// A segmentation of a [`QueryPhrase`]'s word sequence into a contiguous
/// list of non-empty word-index ranges. For a phrase of `n` words there are
/// `2^(n-1)` partitions (every gap between adjacent words either is or
/// isn't a group boundary).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub groups: Vec<Range<usize>>,
}

impl Partition {
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// One candidate association of a query group with a POR document,
/// together with its score components. `edit_distance <= edit_allowance`
/// always.
#[derive(Debug, Clone)]
pub struct Match {
    pub group: Range<usize>,
    pub doc_id: DocId,
    pub relevance: f64,
    pub edit_distance: u32,
    pub edit_allowance: u32,
    pub page_rank: f64,
}

/// A selected match in the winning partition, carrying its resolved POR
/// record and final `match_score`.
#[derive(Debug, Clone)]
pub struct ResolvedMatch {
    pub record: PorRecord,
    pub relevance: f64,
    pub edit_distance: u32,
    pub score: f64,
}

/// The resolver's output for one query call.
#[derive(Debug, Clone, Default)]
pub struct ResultBundle {
    pub matches: Vec<ResolvedMatch>,
    pub unmatched: Vec<String>,
    pub score: f64,
    pub partial: bool,
}
