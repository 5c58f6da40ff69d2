// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

use crate::history::HistoryOptions;
use crate::renderer::RenderOptions;

/// Groups files that change together in a git history and draws one block per group
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the git repository to analyze
    #[arg(short, long, default_value = ".")]
    pub repo: PathBuf,

    /// Where to write the rendered PNG
    #[arg(short, long, default_value = "graph.png")]
    pub output: PathBuf,

    /// Width of the output image in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Height of the output image in pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Count the files of the root commit as one change set
    #[arg(long)]
    pub root: bool,
}

impl Args {
    pub fn history_options(&self) -> HistoryOptions {
        HistoryOptions {
            repo: self.repo.clone(),
            include_root: self.root,
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.width,
            height: self.height,
            output: self.output.clone(),
        }
    }
}
