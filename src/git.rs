// src/git.rs

use crate::blame::{Backend, BlameView, DiffSettings};
use crate::error::{Error, Result};
use crate::model::*;
use git2::{Blame, BlameOptions, Commit, Diff, DiffFindOptions, DiffOptions, Oid, Patch, Repository};
use std::path::Path;
use tracing::{debug, trace};

/// libgit2-backed repository access
pub struct GitBackend {
    repo: Repository,
}

impl GitBackend {
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path).map_err(Error::Repository)?;
        debug!("Opened repository at {}", path.display());
        Ok(Self { repo })
    }

    pub fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Resolves any revspec (full or short id, `HEAD~2`, a tag) to a commit.
    pub fn find_commit(&self, spec: &str) -> Result<Commit<'_>> {
        self.repo
            .revparse_single(spec)
            .and_then(|object| object.peel_to_commit())
            .map_err(Error::Repository)
    }

    pub fn describe(&self, id: &CommitRef) -> Result<CommitSummary> {
        let commit = self.find_commit(id.as_str())?;
        let author = commit.author();
        Ok(CommitSummary {
            id: id.clone(),
            author: author.name().unwrap_or("Unknown").to_string(),
            time: commit.time().seconds(),
            summary: commit.summary().unwrap_or("").to_string(),
        })
    }
}

impl Backend for GitBackend {
    fn commit_diff(&self, fix: &str, settings: &DiffSettings) -> Result<CommitDiff> {
        let commit = self.find_commit(fix)?;

        let parent = if commit.parent_count() > 0 {
            Some(commit.parent(0).map_err(Error::Repository)?)
        } else {
            None
        };
        let parent_tree = match &parent {
            Some(p) => Some(p.tree().map_err(Error::Diff)?),
            None => None,
        };
        let current_tree = commit.tree().map_err(Error::Diff)?;

        let mut diff_opts = DiffOptions::new();
        diff_opts.ignore_filemode(settings.ignore_filemode);

        // A missing old tree makes libgit2 diff against the empty tree
        let mut diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&current_tree), Some(&mut diff_opts))
            .map_err(Error::Diff)?;
        if settings.detect_renames {
            diff.find_similar(Some(DiffFindOptions::new().renames(true))).map_err(Error::Diff)?;
        }

        Ok(CommitDiff {
            fix: commit.id().into(),
            parent: parent.map(|p| p.id().into()),
            files: collect_file_changes(&diff)?,
        })
    }

    fn open_blame<'a>(&'a self, path: &str, revision: &CommitRef) -> Result<Box<dyn BlameView + 'a>> {
        let unavailable = |source| Error::BlameUnavailable { path: path.to_string(), source };

        let oid = Oid::from_str(revision.as_str()).map_err(unavailable)?;
        let mut opts = BlameOptions::new();
        opts.newest_commit(oid);
        let blame = self.repo.blame_file(Path::new(path), Some(&mut opts)).map_err(unavailable)?;

        let lines = blame.iter().map(|hunk| hunk.lines_in_hunk()).sum();
        Ok(Box::new(GitBlame { path: path.to_string(), blame, lines }))
    }
}

struct GitBlame<'repo> {
    path: String,
    blame: Blame<'repo>,
    lines: usize,
}

impl BlameView for GitBlame<'_> {
    fn commit_for_line(&self, line: u32) -> Result<CommitRef> {
        let out_of_range = || Error::LineOutOfRange { path: self.path.clone(), line, lines: self.lines };
        if line == 0 || line as usize > self.lines {
            return Err(out_of_range());
        }
        self.blame
            .get_line(line as usize)
            .map(|hunk| hunk.final_commit_id().into())
            .ok_or_else(out_of_range)
    }

    fn line_count(&self) -> usize {
        self.lines
    }
}

/// Copies every delta of `diff` with its hunks and lines into owned values,
/// so the libgit2 diff can be dropped before any blame runs.
fn collect_file_changes(diff: &Diff<'_>) -> Result<Vec<FileChange>> {
    let mut files = Vec::new();

    for (idx, delta) in diff.deltas().enumerate() {
        let old_path = delta.old_file().path().and_then(|p| p.to_str()).map(String::from);
        let new_path = delta.new_file().path().and_then(|p| p.to_str()).map(String::from);
        let kind = ChangeKind::from(delta.status());

        let mut hunks = Vec::new();
        if let Some(patch) = Patch::from_diff(diff, idx).map_err(Error::Diff)? {
            for hunk_idx in 0..patch.num_hunks() {
                let num_lines = patch.num_lines_in_hunk(hunk_idx).map_err(Error::Diff)?;
                let mut hunk = Hunk { lines: Vec::with_capacity(num_lines) };
                for line_idx in 0..num_lines {
                    let line = patch.line_in_hunk(hunk_idx, line_idx).map_err(Error::Diff)?;
                    let origin = match line.origin() {
                        '+' => LineOrigin::Addition,
                        '-' => LineOrigin::Deletion,
                        ' ' => LineOrigin::Context,
                        // end-of-file newline markers
                        _ => continue,
                    };
                    hunk.lines.push(DiffLine {
                        origin,
                        old_lineno: line.old_lineno().unwrap_or(0),
                        new_lineno: line.new_lineno().unwrap_or(0),
                    });
                }
                hunks.push(hunk);
            }
        }

        trace!("{:?} {:?} -> {:?}: {} hunks", kind, old_path, new_path, hunks.len());
        files.push(FileChange { old_path, new_path, kind, hunks });
    }

    Ok(files)
}
