// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Find the commit that introduced what a fix commit repairs", long_about = None)]
pub struct Args {
    /// Path to the git repository
    #[arg(short, long, default_value = ".")]
    pub repo: PathBuf,

    /// Fix commits to attribute (full or short ids, or any revspec)
    #[arg(required = true)]
    pub commits: Vec<String>,

    /// Extra file extensions to treat as code (repeatable)
    #[arg(long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Blame every changed file, not only code files
    #[arg(long)]
    pub all_files: bool,

    /// Treat renamed files as a deletion plus an addition
    #[arg(long)]
    pub no_renames: bool,

    /// Print one JSON object per commit
    #[arg(long)]
    pub json: bool,

    /// Worker threads when attributing several commits
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Log more (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
