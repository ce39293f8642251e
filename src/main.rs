// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Thrackle search driver.
//!
//! Searches the triangles of `n` points in convex position for sequences of
//! `k` pairwise adjacent triangles and reports what the store collected.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use thrackle_search::geometry::SizeEstimate;
use thrackle_search::layout::{LayoutOptions, TreeLayout, ViewTree};
use thrackle_search::store::{format_sequence, FlatDestination, StoreOutput, StoreStatistics};
use thrackle_search::{Result, SearchConfig, SearchError, SearchVariant, StoreMode};

#[derive(Parser, Debug)]
#[command(name = "thrackle", version, about = "Enumerate triangle thrackles in convex position")]
struct Cli {
    /// Number of points
    #[arg(long)]
    n: usize,

    /// Triangles per sequence (default: the known or conjectured maximum for n)
    #[arg(long)]
    k: Option<usize>,

    /// Adjacency rule: thrackle, crossing-only or edge-disjoint
    #[arg(long, default_value = "thrackle")]
    variant: SearchVariant,

    /// Result store: flat, tree or dry-run
    #[arg(long, default_value = "flat")]
    mode: StoreMode,

    /// Write flat records to this sequence file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Stop after this many accepted sequences
    #[arg(long)]
    max: Option<u64>,

    /// Print only the first sequence, as triangles
    #[arg(long)]
    first: bool,

    /// Lay out the search tree (tree mode)
    #[arg(long)]
    layout: bool,

    /// Print statistics (and layout) as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    n: usize,
    k: usize,
    variant: String,
    mode: String,
    sequences_found: u64,
    exhausted: bool,
    statistics: &'a StoreStatistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout: Option<&'a TreeLayout>,
}

fn default_k(n: usize) -> Result<usize> {
    match SizeEstimate::for_points(n) {
        Some(SizeEstimate::Exact(k)) | Some(SizeEstimate::Range(k, _)) => Ok(k as usize),
        None => Err(SearchError::InvalidConfig(format!(
            "no default sequence length for n = {}; pass --k",
            n
        ))),
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(estimate) = SizeEstimate::for_points(cli.n) {
        info!(n = cli.n, %estimate, "largest thrackle size");
    }
    let k = match cli.k {
        Some(k) => k,
        None => default_k(cli.n)?,
    };

    let mut config = SearchConfig::new(cli.n, k)
        .with_variant(cli.variant)
        .with_mode(cli.mode);
    if let Some(max) = cli.max {
        config = config.with_max_sequences(max);
    }
    config = config.with_destination(match (&cli.output, cli.json) {
        (Some(path), _) => FlatDestination::File(path.clone()),
        (None, false) => FlatDestination::Print,
        (None, true) => FlatDestination::Growable,
    });
    config.validate()?;

    if cli.first {
        match config.first()? {
            Some(triangles) => {
                let text: Vec<String> = triangles.iter().map(|t| t.to_string()).collect();
                println!("{}", text.join(" "));
            }
            None => println!("no sequence of length {}", k),
        }
        return Ok(());
    }

    if cli.layout && cli.mode != StoreMode::Tree {
        return Err(SearchError::InvalidConfig(
            "--layout needs --mode tree".to_string(),
        ));
    }

    let outcome = config.run()?;
    let statistics = &outcome.report.statistics;

    let layout = match (&outcome.report.output, cli.layout) {
        (StoreOutput::Tree(root), true) => {
            let mut view = ViewTree::from_tree(root);
            view.ignore_short_branches(k);
            Some(TreeLayout::compute(&view, &LayoutOptions::default()))
        }
        _ => None,
    };

    if let StoreOutput::File { path, header } = &outcome.report.output {
        info!(path = %path.display(), records = header.record_count, "sequences saved");
    }

    if cli.json {
        let report = JsonReport {
            n: cli.n,
            k,
            variant: cli.variant.to_string(),
            mode: cli.mode.to_string(),
            sequences_found: outcome.summary.sequences(),
            exhausted: outcome.summary.exhausted,
            statistics,
            layout: layout.as_ref(),
        };
        let mut out = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, &report).map_err(std::io::Error::from)?;
        writeln!(out)?;
        return Ok(());
    }

    if let StoreOutput::Tree(root) = &outcome.report.output {
        if root.node_count() <= 64 {
            print!("{}", root);
        }
    }
    if let Some(sequences) = outcome.report.output.sequences() {
        for seq in sequences {
            println!("{}", format_sequence(seq));
        }
    }
    print!("{}", statistics);
    if let Some(layout) = &layout {
        println!(
            "Layout: {} nodes, {:.1} x {:.1}",
            layout.len(),
            layout.bounds.width(),
            layout.bounds.height()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "search failed");
            ExitCode::FAILURE
        }
    }
}
