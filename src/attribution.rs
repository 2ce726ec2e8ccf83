// src/attribution.rs

use crate::blame::{Backend, BlameCache, DiffSettings};
use crate::classifier::classify_file;
use crate::error::{Error, Result};
use crate::filetype::CodeFilter;
use crate::frequency::FrequencyTable;
use crate::model::*;
use tracing::{debug, info, warn};

/// Settings for one attribution run
#[derive(Debug, Clone)]
pub struct AttributionConfig {
    pub code_filter: CodeFilter,
    pub diff: DiffSettings,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self { code_filter: CodeFilter::default(), diff: DiffSettings::default() }
    }
}

/// Finds the commit most likely to have introduced what `fix` repairs.
pub fn attribute<B: Backend + ?Sized>(backend: &B, fix: &str, config: &AttributionConfig) -> Result<CommitRef> {
    attribute_detailed(backend, fix, config).map(|a| a.blamed)
}

/// Like [`attribute`], returning the full tally alongside the winner.
pub fn attribute_detailed<B: Backend + ?Sized>(
    backend: &B,
    fix: &str,
    config: &AttributionConfig,
) -> Result<Attribution> {
    let diff = backend.commit_diff(fix, &config.diff)?;
    let mut tally = FrequencyTable::new();
    let mut targets = 0;
    let mut skipped = 0;

    match &diff.parent {
        Some(parent) => {
            let mut blames = BlameCache::new(backend, parent.clone());
            for file in &diff.files {
                let Some(path) = eligible_path(file, &diff.fix, &config.code_filter) else {
                    continue;
                };

                let lines = classify_file(&file.hunks);
                debug!("{}: {} -> {} blame targets", diff.fix, path, lines.len());
                targets += lines.len();

                for (i, &line) in lines.iter().enumerate() {
                    let target = BlameTarget { file_path: path.to_string(), parent_lineno: line };
                    match resolve(&mut blames, &target) {
                        Ok(result) => {
                            debug!("{}: blame {}:{} -> {}", diff.fix, path, result.line, result.commit);
                            tally.add(result.commit);
                        }
                        Err(e @ Error::BlameUnavailable { .. }) => {
                            warn!("{}: {}", diff.fix, e);
                            skipped += lines.len() - i;
                            break;
                        }
                        Err(e) if e.is_recoverable() => {
                            warn!("{}: could not get blame for {}:{}: {}", diff.fix, path, line, e);
                            skipped += 1;
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }
        None => debug!("{}: root commit, nothing to blame", diff.fix),
    }

    let resolved = tally.total();
    let (blamed, votes) = tally.max().map_err(|_| Error::NoBlameFound { commit: diff.fix.clone() })?;
    info!("{}: blame {} ({} of {} resolved targets)", diff.fix, blamed, votes, resolved);

    Ok(Attribution {
        fix: diff.fix,
        parent: diff.parent,
        blamed,
        votes,
        targets,
        resolved,
        skipped,
        tally: tally.into_entries(),
    })
}

/// The parent-side path to blame, or `None` when the file has no history
/// in the parent or is not code.
fn eligible_path<'f>(file: &'f FileChange, fix: &CommitRef, filter: &CodeFilter) -> Option<&'f str> {
    if file.kind == ChangeKind::Added {
        debug!("{}: {:?} is new, skipping", fix, file.new_path);
        return None;
    }
    let path = file.old_path.as_deref()?;
    let is_code = filter.is_code_file(path);
    debug!("{}: {} is code -> {}", fix, path, is_code);
    is_code.then_some(path)
}

fn resolve<B: Backend + ?Sized>(blames: &mut BlameCache<'_, B>, target: &BlameTarget) -> Result<BlameResult> {
    let commit = blames.resolve(&target.file_path, target.parent_lineno)?;
    Ok(BlameResult { line: target.parent_lineno, commit })
}
