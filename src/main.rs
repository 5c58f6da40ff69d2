// src/main.rs

use anyhow::Context;
use clap::Parser;
use git_cluster::cli::Args;
use git_cluster::cluster::ClusterEngine;
use git_cluster::history::{self, GitHistory};
use git_cluster::model::Partition;
use git_cluster::renderer;
use std::io::{self, Write};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let start_time = Instant::now();
    let source = GitHistory::open(args.history_options())
        .with_context(|| format!("reading history of {}", args.repo.display()))?;
    let history = history::collect(&source)
        .with_context(|| format!("reading history of {}", args.repo.display()))?;

    let mut engine = ClusterEngine::new();
    for change_set in history.change_sets() {
        engine.add(change_set);
    }
    info!(
        commits = history.commits.len(),
        files = engine.file_count(),
        groups = engine.group_count(),
        "clustering finished in {:.2?}",
        start_time.elapsed()
    );
    let partition = engine.finish();

    print_groups(&mut io::stdout().lock(), &partition).context("printing groups")?;

    let render_options = args.render_options();
    renderer::render(&partition, &render_options)
        .with_context(|| format!("rendering {}", render_options.output.display()))?;

    Ok(())
}

fn print_groups<W: Write>(out: &mut W, partition: &Partition) -> io::Result<()> {
    for (index, group) in partition.iter().enumerate() {
        writeln!(out, "Group {}:", index + 1)?;
        for file in group {
            writeln!(out, "\t{file}")?;
        }
    }
    out.flush()
}
