// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index document construction: turns a [`crate::types::PorRecord`] into
//! the set of transliterated terms and the document weight the full-text
//! store indexes against.

pub mod builder;
pub mod document;

pub use builder::build_index;
#[cfg(feature = "parallel")]
pub use builder::build_index_parallel;
pub use document::{build_terms, IndexDocument};
