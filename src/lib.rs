// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Free-text travel query resolution: resolve strings like `"cdg"` or
//! `"rio de janero"` into points of reference (airports, rail/bus/ferry
//! stations, heliports, off-points, and the cities they serve) drawn from
//! a POR catalog and a PageRank popularity table.
//!
//! The core pipeline: transliterate the query, partition it into
//! contiguous word groups, fuzzy-match each group against a full-text
//! index, score every partition's best-per-group matches, and select the
//! highest-scoring covering combination. See [`resolver::Resolver`] for
//! the call surface.

pub mod catalog;
pub mod error;
pub mod fuzzy;
pub mod index;
pub mod matcher;
pub mod pagerank;
pub mod partition;
pub mod resolver;
pub mod scoring;
pub mod selector;
pub mod serialize;
pub mod store;
pub mod transliterate;
pub mod types;

pub use error::{ResolverError, Result};
pub use resolver::{Resolver, ResolverConfig};
pub use types::{PorKind, PorKey, PorRecord, ResultBundle};
