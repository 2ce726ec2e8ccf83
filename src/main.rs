// src/main.rs

mod cli;

use anyhow::Context;
use chrono::TimeZone;
use clap::Parser;
use cli::Args;
use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use vcc_finder::blame::DiffSettings;
use vcc_finder::filetype::CodeFilter;
use vcc_finder::model::CommitSummary;
use vcc_finder::{attribute_detailed, Attribution, AttributionConfig, GitBackend};

#[derive(Serialize)]
struct Report {
    commit: String,
    #[serde(flatten)]
    attribution: Attribution,
    blamed_commit: Option<CommitSummary>,
}

#[derive(Serialize)]
struct Failure {
    commit: String,
    error: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Attributes every requested commit. Returns whether all of them succeeded.
fn run(args: &Args) -> anyhow::Result<bool> {
    let start_time = Instant::now();

    // Fail early on a bad path instead of once per worker
    GitBackend::open(&args.repo).with_context(|| format!("cannot open repository {}", args.repo.display()))?;

    let code_filter = if args.all_files {
        CodeFilter::all()
    } else {
        CodeFilter::default().with_extensions(&args.extensions)
    };
    let diff = DiffSettings { detect_renames: !args.no_renames, ..Default::default() };
    let config = AttributionConfig { code_filter, diff };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs.unwrap_or(0))
        .build()
        .context("cannot start worker threads")?;

    let bar = if args.commits.len() > 1 { ProgressBar::new(args.commits.len() as u64) } else { ProgressBar::hidden() };
    bar.set_message("Attributing commits");

    // Repository handles are not shared between threads; each task opens its own
    let results: Vec<Result<Report, Failure>> = pool.install(|| {
        args.commits
            .par_iter()
            .progress_with(bar.clone())
            .map(|spec| attribute_one(&args.repo, spec, &config))
            .collect()
    });
    bar.finish_and_clear();

    let mut all_ok = true;
    for result in &results {
        match result {
            Ok(report) => print_report(report, args.json)?,
            Err(failure) => {
                all_ok = false;
                print_failure(failure, args.json)?;
            }
        }
    }

    tracing::info!("Attributed {} commits in {:.2?}", results.len(), start_time.elapsed());
    Ok(all_ok)
}

fn attribute_one(repo: &Path, spec: &str, config: &AttributionConfig) -> Result<Report, Failure> {
    let failure = |e: vcc_finder::Error| Failure { commit: spec.to_string(), error: e.to_string() };

    let backend = GitBackend::open(repo).map_err(failure)?;
    let attribution = attribute_detailed(&backend, spec, config).map_err(failure)?;
    let blamed_commit = match backend.describe(&attribution.blamed) {
        Ok(summary) => Some(summary),
        Err(e) => {
            tracing::warn!("{}: cannot describe {}: {}", spec, attribution.blamed, e);
            None
        }
    };

    Ok(Report { commit: spec.to_string(), attribution, blamed_commit })
}

fn print_report(report: &Report, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }

    let a = &report.attribution;
    println!("{} -> {} ({}/{} votes, {} targets, {} skipped)", a.fix, a.blamed, a.votes, a.resolved, a.targets, a.skipped);
    if let Some(summary) = &report.blamed_commit {
        let when = chrono::Utc
            .timestamp_opt(summary.time, 0)
            .single()
            .map(|t| t.to_rfc2822())
            .unwrap_or_else(|| summary.time.to_string());
        println!("    {} <{}> {}", when, summary.author, summary.summary);
    }
    Ok(())
}

fn print_failure(failure: &Failure, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(failure)?);
    } else {
        eprintln!("{}: {}", failure.commit, failure.error);
    }
    Ok(())
}
