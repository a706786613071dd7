// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error kinds for catalog ingestion, index build, and query resolution.

use thiserror::Error;

/// Everything that can go wrong between reading raw input files and
/// returning a [`crate::types::ResultBundle`] from a resolver call.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The POR catalog source is absent, unreadable, or not valid UTF-8.
    #[error("POR catalog not readable: {0}")]
    CatalogNotReadable(String),

    /// A line in the POR catalog violates field arity or a mandatory field
    /// is missing. `line`/`column` are 1-based.
    #[error("POR catalog malformed at line {line}, column {column}: {message}")]
    CatalogFormatError {
        line: usize,
        column: usize,
        message: String,
    },

    /// The PageRank table is malformed. Non-fatal: callers fall back to
    /// floor weights for every key and proceed.
    #[error("PageRank table malformed: {0}")]
    PageRankFormatError(String),

    /// Index construction failed: target directory unwritable, or the
    /// underlying index engine reported corruption. Fatal to the build;
    /// partial output must be discarded by the caller.
    #[error("index build failed: {0}")]
    IndexBuildError(String),

    /// The full-text index could not be opened read-only for a resolver
    /// call. Fatal to that call.
    #[error("full-text index unavailable: {0}")]
    MatcherIndexUnavailable(String),

    /// A resolver call's wall-clock deadline expired before selection
    /// completed. Carries the best partition found so far - constructed
    /// by the caller from the partial [`crate::types::ResultBundle`], not
    /// from this variant directly, since `Cancelled` is non-fatal and the
    /// partial result is what callers actually want.
    #[error("resolver call cancelled after deadline")]
    Cancelled,

    /// The phrase was empty after transliteration. Not a true error: the
    /// resolver returns an empty bundle with `partial = false` for this
    /// case rather than bubbling it up; the variant exists so internal
    /// code can use `?` uniformly before the empty-bundle short circuit.
    #[error("query phrase was empty after transliteration")]
    InvalidQuery,
}

pub type Result<T> = std::result::Result<T, ResolverError>;
