// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Thin command-line wrapper around [`crate::resolver::Resolver`]. Not
//! part of the core's contract - this only exists to exercise the build
//! and query paths from a terminal, mapping outcomes to the exit codes a
//! CLI front-end is expected to use.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "trepresolve", about = "Resolve free-text travel queries into points of reference")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a full-text index from a POR catalog and a PageRank table.
    Build {
        /// Path to the caret-separated POR catalog (optionally .gz/.bz2).
        #[arg(long)]
        catalog: PathBuf,
        /// Path to the PageRank table (key,weight CSV).
        #[arg(long)]
        pagerank: PathBuf,
        /// Output directory for the built index; recreated if it exists.
        #[arg(long)]
        index_dir: PathBuf,
    },
    /// Resolve a single free-text query against a built index.
    Query {
        /// Directory of a previously built index.
        #[arg(long)]
        index_dir: PathBuf,
        /// The free-text phrase to resolve.
        phrase: String,
        /// Maximum edit distance to allow; defaults to the spec's
        /// length-derived formula when omitted.
        #[arg(long)]
        max_edit: Option<u32>,
        /// Maximum number of candidates to keep per matcher invocation.
        #[arg(long, default_value_t = 20)]
        top_k: usize,
        /// Wall-clock budget for the whole call, in milliseconds.
        #[arg(long, default_value_t = 2000)]
        deadline_ms: u64,
        /// Emit the versioned binary encoding instead of JSON.
        #[arg(long)]
        binary: bool,
    },
}
