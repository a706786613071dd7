// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result-bundle wire formats: a JSON envelope and an equivalent versioned
//! binary encoding. Decoupled from the in-memory [`crate::types::ResultBundle`]
//! so the wire shape can be documented and versioned independently of
//! internal representation changes.

use serde::{Deserialize, Serialize};

use crate::types::ResultBundle;

const BINARY_SCHEMA_VERSION: u8 = 1;

/// One resolved location as it appears on the wire: the POR key plus the
/// score components a caller needs to rank/display it, without the full
/// internal [`crate::types::PorRecord`] shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub iata_code: String,
    pub icao_code: String,
    pub geonames_id: u64,
    pub name: String,
    pub relevance: f64,
    pub edit_distance: u32,
    pub score: f64,
}

/// The JSON/binary envelope: `locations`, `unmatched`, `partial`, `score`,
/// with an optional `error` populated only when the call itself failed
/// (recoverable per-partition misses are absorbed, never surfaced here).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub locations: Vec<LocationEntry>,
    pub unmatched: Vec<String>,
    pub partial: bool,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&ResultBundle> for ResultEnvelope {
    fn from(bundle: &ResultBundle) -> Self {
        ResultEnvelope {
            locations: bundle
                .matches
                .iter()
                .map(|m| LocationEntry {
                    iata_code: m.record.key.iata_code.clone(),
                    icao_code: m.record.key.icao_code.clone(),
                    geonames_id: m.record.key.geonames_id,
                    name: m
                        .record
                        .primary_names
                        .first()
                        .map(|n| n.text.clone())
                        .unwrap_or_default(),
                    relevance: m.relevance,
                    edit_distance: m.edit_distance,
                    score: m.score,
                })
                .collect(),
            unmatched: bundle.unmatched.clone(),
            partial: bundle.partial,
            score: bundle.score,
            error: None,
        }
    }
}

pub fn error_envelope(message: &str) -> ResultEnvelope {
    ResultEnvelope {
        locations: Vec::new(),
        unmatched: Vec::new(),
        partial: false,
        score: 0.0,
        error: Some(message.to_string()),
    }
}

pub fn to_json(bundle: &ResultBundle) -> serde_json::Result<String> {
    serde_json::to_string(&ResultEnvelope::from(bundle))
}

pub fn from_json(text: &str) -> serde_json::Result<ResultEnvelope> {
    serde_json::from_str(text)
}

fn write_len_prefixed(out: &mut Vec<u8>, s: &str) {
    let bytes = s.as_bytes();
    out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(bytes);
}

fn read_len_prefixed(bytes: &[u8], cursor: &mut usize) -> Option<String> {
    let len = u32::from_le_bytes(bytes.get(*cursor..*cursor + 4)?.try_into().ok()?) as usize;
    *cursor += 4;
    let s = std::str::from_utf8(bytes.get(*cursor..*cursor + len)?).ok()?.to_string();
    *cursor += len;
    Some(s)
}

/// Encodes a result bundle as: one schema-version byte, the envelope
/// fields length-prefixed, and a trailing CRC32 of everything before it -
/// the same "leading version byte + checksum footer" shape used for the
/// on-disk full-text index, applied here to the wire format §9 calls out
/// as needing versioning.
pub fn to_binary(bundle: &ResultBundle) -> Vec<u8> {
    let envelope = ResultEnvelope::from(bundle);
    let mut out = Vec::new();
    out.push(BINARY_SCHEMA_VERSION);

    out.extend_from_slice(&(envelope.locations.len() as u32).to_le_bytes());
    for loc in &envelope.locations {
        write_len_prefixed(&mut out, &loc.iata_code);
        write_len_prefixed(&mut out, &loc.icao_code);
        out.extend_from_slice(&loc.geonames_id.to_le_bytes());
        write_len_prefixed(&mut out, &loc.name);
        out.extend_from_slice(&loc.relevance.to_le_bytes());
        out.extend_from_slice(&loc.edit_distance.to_le_bytes());
        out.extend_from_slice(&loc.score.to_le_bytes());
    }

    out.extend_from_slice(&(envelope.unmatched.len() as u32).to_le_bytes());
    for word in &envelope.unmatched {
        write_len_prefixed(&mut out, word);
    }

    out.push(u8::from(envelope.partial));
    out.extend_from_slice(&envelope.score.to_le_bytes());

    let checksum = crc32fast::hash(&out);
    out.extend_from_slice(&checksum.to_le_bytes());
    out
}

#[derive(Debug)]
pub enum BinaryDecodeError {
    Truncated,
    UnsupportedVersion(u8),
    ChecksumMismatch,
    Utf8,
}

pub fn from_binary(bytes: &[u8]) -> Result<ResultEnvelope, BinaryDecodeError> {
    if bytes.len() < 1 + 4 {
        return Err(BinaryDecodeError::Truncated);
    }
    let (body, footer) = bytes.split_at(bytes.len() - 4);
    let expected = u32::from_le_bytes(footer.try_into().unwrap());
    if crc32fast::hash(body) != expected {
        return Err(BinaryDecodeError::ChecksumMismatch);
    }

    let version = body[0];
    if version != BINARY_SCHEMA_VERSION {
        return Err(BinaryDecodeError::UnsupportedVersion(version));
    }

    let mut cursor = 1usize;
    let location_count = u32::from_le_bytes(body.get(cursor..cursor + 4).ok_or(BinaryDecodeError::Truncated)?.try_into().unwrap()) as usize;
    cursor += 4;

    let mut locations = Vec::with_capacity(location_count);
    for _ in 0..location_count {
        let iata_code = read_len_prefixed(body, &mut cursor).ok_or(BinaryDecodeError::Truncated)?;
        let icao_code = read_len_prefixed(body, &mut cursor).ok_or(BinaryDecodeError::Truncated)?;
        let geonames_id = u64::from_le_bytes(body.get(cursor..cursor + 8).ok_or(BinaryDecodeError::Truncated)?.try_into().unwrap());
        cursor += 8;
        let name = read_len_prefixed(body, &mut cursor).ok_or(BinaryDecodeError::Truncated)?;
        let relevance = f64::from_le_bytes(body.get(cursor..cursor + 8).ok_or(BinaryDecodeError::Truncated)?.try_into().unwrap());
        cursor += 8;
        let edit_distance = u32::from_le_bytes(body.get(cursor..cursor + 4).ok_or(BinaryDecodeError::Truncated)?.try_into().unwrap());
        cursor += 4;
        let score = f64::from_le_bytes(body.get(cursor..cursor + 8).ok_or(BinaryDecodeError::Truncated)?.try_into().unwrap());
        cursor += 8;
        locations.push(LocationEntry {
            iata_code,
            icao_code,
            geonames_id,
            name,
            relevance,
            edit_distance,
            score,
        });
    }

    let unmatched_count = u32::from_le_bytes(body.get(cursor..cursor + 4).ok_or(BinaryDecodeError::Truncated)?.try_into().unwrap()) as usize;
    cursor += 4;
    let mut unmatched = Vec::with_capacity(unmatched_count);
    for _ in 0..unmatched_count {
        unmatched.push(read_len_prefixed(body, &mut cursor).ok_or(BinaryDecodeError::Truncated)?);
    }

    let partial = *body.get(cursor).ok_or(BinaryDecodeError::Truncated)? != 0;
    cursor += 1;
    let score = f64::from_le_bytes(body.get(cursor..cursor + 8).ok_or(BinaryDecodeError::Truncated)?.try_into().unwrap());

    let _ = BinaryDecodeError::Utf8; // variant reserved for read_len_prefixed's UTF-8 failure path, folded into Truncated above
    Ok(ResultEnvelope {
        locations,
        unmatched,
        partial,
        score,
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LocalizedName, PorKey, PorKind, PorRecord, ResolvedMatch};

    fn sample_bundle() -> ResultBundle {
        ResultBundle {
            matches: vec![ResolvedMatch {
                record: PorRecord {
                    key: PorKey {
                        iata_code: "CDG".into(),
                        icao_code: "LFPG".into(),
                        geonames_id: 6269554,
                    },
                    kind: PorKind::Airport,
                    primary_names: vec![LocalizedName {
                        lang: "local".into(),
                        text: "Paris Charles de Gaulle".into(),
                    }],
                    alternate_names: vec![],
                    serving_cities: vec![],
                    country_code: "FR".into(),
                    adm1_code: "11".into(),
                    latitude: 49.0097,
                    longitude: 2.5478,
                    date_from: None,
                    date_until: None,
                    page_rank: 1.0,
                },
                relevance: 1.0,
                edit_distance: 0,
                score: 0.95,
            }],
            unmatched: vec!["blargh".to_string()],
            score: 0.9,
            partial: false,
        }
    }

    #[test]
    fn json_round_trips() {
        let bundle = sample_bundle();
        let json = to_json(&bundle).unwrap();
        let parsed = from_json(&json).unwrap();
        assert_eq!(parsed, ResultEnvelope::from(&bundle));
    }

    #[test]
    fn binary_round_trips() {
        let bundle = sample_bundle();
        let bytes = to_binary(&bundle);
        let parsed = from_binary(&bytes).unwrap();
        assert_eq!(parsed, ResultEnvelope::from(&bundle));
    }

    #[test]
    fn binary_detects_corruption() {
        let bundle = sample_bundle();
        let mut bytes = to_binary(&bundle);
        let last = bytes.len() - 5;
        bytes[last] ^= 0xFF;
        assert!(matches!(from_binary(&bytes), Err(BinaryDecodeError::ChecksumMismatch)));
    }

    #[test]
    fn binary_rejects_unknown_version() {
        let bundle = sample_bundle();
        let mut bytes = to_binary(&bundle);
        bytes[0] = 99;
        // Version lives before the checksum, so bump the checksum too or
        // this trips ChecksumMismatch first; recompute it here to isolate
        // the version check.
        let new_crc = crc32fast::hash(&bytes[..bytes.len() - 4]);
        let len = bytes.len();
        bytes[len - 4..].copy_from_slice(&new_crc.to_le_bytes());
        assert!(matches!(from_binary(&bytes), Err(BinaryDecodeError::UnsupportedVersion(99))));
    }

    #[test]
    fn error_envelope_carries_error_and_empty_locations() {
        let env = error_envelope("index unavailable");
        assert_eq!(env.error.as_deref(), Some("index unavailable"));
        assert!(env.locations.is_empty());
    }
}
