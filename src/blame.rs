// src/blame.rs

use crate::error::{Error, Result};
use crate::model::{CommitDiff, CommitRef};
use std::collections::HashMap;
use tracing::debug;

/// Per-line authorship of one file at one revision
pub trait BlameView {
    /// The commit that last modified `line` (1-based)
    fn commit_for_line(&self, line: u32) -> Result<CommitRef>;

    fn line_count(&self) -> usize;
}

/// Options for computing a fix commit's diff
#[derive(Debug, Clone, Copy)]
pub struct DiffSettings {
    pub ignore_filemode: bool,
    /// Pair deleted and added files into renames before classifying
    pub detect_renames: bool,
}

impl Default for DiffSettings {
    fn default() -> Self {
        Self { ignore_filemode: true, detect_renames: true }
    }
}

/// The version-control operations the attribution needs
pub trait Backend {
    /// Line-level diff of `fix` against its first parent, or against the
    /// empty tree when `fix` has no parent.
    fn commit_diff(&self, fix: &str, settings: &DiffSettings) -> Result<CommitDiff>;

    /// Backward blame of `path` as of `revision`
    fn open_blame<'a>(&'a self, path: &str, revision: &CommitRef) -> Result<Box<dyn BlameView + 'a>>;
}

/// Blame views opened during one run, at most one per path.
///
/// A path whose blame failed to open is remembered as unavailable so the
/// backend is not asked again.
pub struct BlameCache<'a, B: Backend + ?Sized> {
    backend: &'a B,
    revision: CommitRef,
    views: HashMap<String, Option<Box<dyn BlameView + 'a>>>,
}

impl<'a, B: Backend + ?Sized> BlameCache<'a, B> {
    pub fn new(backend: &'a B, revision: CommitRef) -> Self {
        Self { backend, revision, views: HashMap::new() }
    }

    /// Resolves `line` of `path`, opening the file's blame on first use.
    pub fn resolve(&mut self, path: &str, line: u32) -> Result<CommitRef> {
        if !self.views.contains_key(path) {
            match self.backend.open_blame(path, &self.revision) {
                Ok(view) => {
                    debug!("{}: opened blame for {} ({} lines)", self.revision, path, view.line_count());
                    self.views.insert(path.to_string(), Some(view));
                }
                Err(e) => {
                    self.views.insert(path.to_string(), None);
                    return Err(e);
                }
            }
        }
        match self.views.get(path) {
            Some(Some(view)) => view.commit_for_line(line),
            _ => Err(Error::BlameUnavailable {
                path: path.to_string(),
                source: git2::Error::from_str("blame failed earlier in this run"),
            }),
        }
    }
}
