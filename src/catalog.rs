// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! POR catalog ingestion: parses the caret-separated POR CSV into typed
//! [`PorRecord`]s, with transparent gzip/bzip2 decompression inferred from
//! the file extension.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{ResolverError, Result};
use crate::types::{CityRef, LocalizedName, PorKey, PorKind, PorRecord};

/// Columns the POR catalog must carry, in no particular order (the header
/// line is consulted by name, not by position).
const MANDATORY_COLUMNS: &[&str] = &[
    "iata_code",
    "icao_code",
    "geoname_id",
    "latitude",
    "longitude",
    "loc_type",
    "name",
    "asciiname",
    "alternatenames",
    "country_code",
    "adm1_code",
    "date_from",
    "date_until",
    "city_code_list",
];

fn open_decompressed(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)
        .map_err(|e| ResolverError::CatalogNotReadable(format!("{}: {e}", path.display())))?;
    let reader = BufReader::new(file);
    match path.extension().and_then(|e| e.to_str()) {
        Some("gz") => Ok(Box::new(flate2::read::GzDecoder::new(reader))),
        Some("bz2") => Ok(Box::new(bzip2::read::BzDecoder::new(reader))),
        _ => Ok(Box::new(reader)),
    }
}

/// Parses the pipe-separated `lang=name` alternate-name list.
fn parse_alternate_names(raw: &str) -> Vec<LocalizedName> {
    raw.split('|')
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let (lang, text) = part.split_once('=')?;
            if text.is_empty() {
                return None;
            }
            Some(LocalizedName {
                lang: lang.to_string(),
                text: text.to_string(),
            })
        })
        .collect()
}

/// Parses the comma-separated serving-city IATA code list. The catalog
/// carries no inline names for these, only codes; resolving full city
/// records, if ever needed, is the caller's job.
fn parse_city_refs(raw: &str) -> Vec<CityRef> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| CityRef {
            key: PorKey {
                iata_code: code.to_string(),
                icao_code: String::new(),
                geonames_id: 0,
            },
            names: Vec::new(),
        })
        .collect()
}

fn parse_record(headers: &csv::StringRecord, record: &csv::StringRecord, line: usize) -> Result<PorRecord> {
    let field = |name: &str, column: usize| -> Result<String> {
        headers
            .iter()
            .position(|h| h == name)
            .and_then(|idx| record.get(idx))
            .map(str::to_string)
            .ok_or_else(|| ResolverError::CatalogFormatError {
                line,
                column,
                message: format!("missing field `{name}`"),
            })
    };

    let iata_code = field("iata_code", 1)?;
    let icao_code = field("icao_code", 2)?;
    let geoname_id_raw = field("geoname_id", 3)?;
    let latitude_raw = field("latitude", 4)?;
    let longitude_raw = field("longitude", 5)?;
    let loc_type_raw = field("loc_type", 6)?;
    let name = field("name", 7)?;
    let asciiname = field("asciiname", 8)?;
    let alternatenames_raw = field("alternatenames", 9)?;
    let country_code = field("country_code", 10)?;
    let adm1_code = field("adm1_code", 11)?;
    let date_from_raw = field("date_from", 12)?;
    let date_until_raw = field("date_until", 13)?;
    let city_code_list_raw = field("city_code_list", 14)?;

    let geonames_id: u64 = if geoname_id_raw.is_empty() {
        0
    } else {
        geoname_id_raw.parse().map_err(|_| ResolverError::CatalogFormatError {
            line,
            column: 3,
            message: format!("invalid geoname_id `{geoname_id_raw}`"),
        })?
    };

    let key = PorKey {
        iata_code,
        icao_code,
        geonames_id,
    };
    if !key.is_valid() {
        return Err(ResolverError::CatalogFormatError {
            line,
            column: 1,
            message: "neither iata_code nor geoname_id is set".to_string(),
        });
    }

    let kind = loc_type_raw
        .chars()
        .next()
        .and_then(PorKind::from_code)
        .ok_or_else(|| ResolverError::CatalogFormatError {
            line,
            column: 6,
            message: format!("unknown loc_type `{loc_type_raw}`"),
        })?;

    let latitude: f64 = latitude_raw.parse().map_err(|_| ResolverError::CatalogFormatError {
        line,
        column: 4,
        message: format!("invalid latitude `{latitude_raw}`"),
    })?;
    let longitude: f64 = longitude_raw.parse().map_err(|_| ResolverError::CatalogFormatError {
        line,
        column: 5,
        message: format!("invalid longitude `{longitude_raw}`"),
    })?;

    let mut primary_names = Vec::new();
    if !name.is_empty() {
        primary_names.push(LocalizedName {
            lang: "local".to_string(),
            text: name,
        });
    }
    if !asciiname.is_empty() {
        primary_names.push(LocalizedName {
            lang: "ascii".to_string(),
            text: asciiname,
        });
    }

    Ok(PorRecord {
        key,
        kind,
        primary_names,
        alternate_names: parse_alternate_names(&alternatenames_raw),
        serving_cities: parse_city_refs(&city_code_list_raw),
        country_code,
        adm1_code,
        latitude,
        longitude,
        date_from: (!date_from_raw.is_empty()).then_some(date_from_raw),
        date_until: (!date_until_raw.is_empty()).then_some(date_until_raw),
        page_rank: crate::pagerank::FLOOR_WEIGHT,
    })
}

/// Loads the full POR catalog eagerly into memory. The CSV crate is used
/// purely for correct caret-quoting/escaping behavior; the header line is
/// still validated against [`MANDATORY_COLUMNS`] up front so a missing
/// column is reported once rather than once per data line.
pub fn load_catalog(path: &Path) -> Result<Vec<PorRecord>> {
    let source = open_decompressed(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'^')
        .has_headers(true)
        .flexible(false)
        .from_reader(source);

    let headers = reader.headers().map_err(|e| ResolverError::CatalogNotReadable(e.to_string()))?.clone();
    for column in MANDATORY_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(ResolverError::CatalogFormatError {
                line: 1,
                column: 0,
                message: format!("missing mandatory column `{column}` in header"),
            });
        }
    }

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2; // header occupies line 1
        let record = result.map_err(|e| ResolverError::CatalogFormatError {
            line,
            column: 0,
            message: e.to_string(),
        })?;
        records.push(parse_record(&headers, &record, line)?);
    }
    Ok(records)
}
