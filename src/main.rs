// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

mod cli;

use std::process::ExitCode;

use clap::Parser;

use opentrep_resolver::error::ResolverError;
use opentrep_resolver::resolver::{Resolver, ResolverConfig};
use opentrep_resolver::serialize;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::from(0),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn exit_code_for(err: &ResolverError) -> u8 {
    match err {
        ResolverError::CatalogNotReadable(_) => 1,
        ResolverError::CatalogFormatError { .. } => 2,
        ResolverError::PageRankFormatError(_) => 2,
        ResolverError::IndexBuildError(_) => 3,
        ResolverError::MatcherIndexUnavailable(_) => 3,
        ResolverError::Cancelled | ResolverError::InvalidQuery => 4,
    }
}

fn run(command: Commands) -> opentrep_resolver::Result<()> {
    match command {
        Commands::Build { catalog, pagerank, index_dir } => {
            let resolver = Resolver::build(&catalog, &pagerank, &index_dir)?;
            println!("built index with {} documents at {}", resolver.doc_count(), index_dir.display());
            Ok(())
        }
        Commands::Query {
            index_dir,
            phrase,
            max_edit,
            top_k,
            deadline_ms,
            binary,
        } => {
            let resolver = Resolver::open(&index_dir)?;
            let config = ResolverConfig {
                max_edit,
                top_k,
                deadline: std::time::Duration::from_millis(deadline_ms),
            };
            let bundle = resolver.interpret(&phrase, &config);

            if binary {
                let bytes = serialize::to_binary(&bundle);
                use std::io::Write;
                std::io::stdout().write_all(&bytes).expect("stdout write");
            } else {
                let json = serialize::to_json(&bundle).expect("result bundle always serializes");
                println!("{json}");
            }
            Ok(())
        }
    }
}
