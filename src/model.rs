// src/model.rs

use serde::Serialize;
use std::fmt;

/// Identifies a commit by its hex object id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CommitRef(String);

impl CommitRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<git2::Oid> for CommitRef {
    fn from(oid: git2::Oid) -> Self {
        Self(oid.to_string())
    }
}

impl From<&str> for CommitRef {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// How a file changed between the parent and the fix commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Deleted,
    Modified,
    Renamed,
    Copied,
    Typechange,
    Other,
}

impl From<git2::Delta> for ChangeKind {
    fn from(delta: git2::Delta) -> Self {
        match delta {
            git2::Delta::Added => ChangeKind::Added,
            git2::Delta::Deleted => ChangeKind::Deleted,
            git2::Delta::Modified => ChangeKind::Modified,
            git2::Delta::Renamed => ChangeKind::Renamed,
            git2::Delta::Copied => ChangeKind::Copied,
            git2::Delta::Typechange => ChangeKind::Typechange,
            _ => ChangeKind::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOrigin {
    Context,
    Addition,
    Deletion,
}

/// A single line of a hunk. Line numbers are 1-based; 0 means the line
/// does not exist on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffLine {
    pub origin: LineOrigin,
    pub old_lineno: u32,
    pub new_lineno: u32,
}

impl DiffLine {
    pub fn context(old_lineno: u32, new_lineno: u32) -> Self {
        Self { origin: LineOrigin::Context, old_lineno, new_lineno }
    }

    pub fn addition(new_lineno: u32) -> Self {
        Self { origin: LineOrigin::Addition, old_lineno: 0, new_lineno }
    }

    pub fn deletion(old_lineno: u32) -> Self {
        Self { origin: LineOrigin::Deletion, old_lineno, new_lineno: 0 }
    }
}

/// One contiguous change region of a file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hunk {
    pub lines: Vec<DiffLine>,
}

/// One entry of a commit's diff, fully materialised
#[derive(Debug, Clone)]
pub struct FileChange {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub kind: ChangeKind,
    pub hunks: Vec<Hunk>,
}

/// The line-level diff between a fix commit and its first parent
#[derive(Debug, Clone)]
pub struct CommitDiff {
    pub fix: CommitRef,
    /// `None` for a root commit, which is diffed against the empty tree
    pub parent: Option<CommitRef>,
    pub files: Vec<FileChange>,
}

/// A line of the parent version of a file selected for blaming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlameTarget {
    pub file_path: String,
    pub parent_lineno: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlameResult {
    pub line: u32,
    pub commit: CommitRef,
}

/// Outcome of one attribution run
#[derive(Debug, Clone, Serialize)]
pub struct Attribution {
    pub fix: CommitRef,
    pub parent: Option<CommitRef>,
    pub blamed: CommitRef,
    /// How many resolved targets pointed at `blamed`
    pub votes: usize,
    pub targets: usize,
    pub resolved: usize,
    pub skipped: usize,
    /// Every tallied commit, first-seen first
    pub tally: Vec<(CommitRef, usize)>,
}

/// Human-facing details of a commit
#[derive(Debug, Clone, Serialize)]
pub struct CommitSummary {
    pub id: CommitRef,
    pub author: String,
    pub time: i64,
    pub summary: String,
}
