// src/error.rs

use crate::model::CommitRef;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The repository cannot be opened or a commit does not resolve
    #[error("repository error: {0}")]
    Repository(#[source] git2::Error),

    #[error("diff error: {0}")]
    Diff(#[source] git2::Error),

    #[error("blame unavailable for {path}: {source}")]
    BlameUnavailable {
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("line {line} out of range for {path} ({lines} lines)")]
    LineOutOfRange { path: String, line: u32, lines: usize },

    #[error("frequency table is empty")]
    Empty,

    #[error("no blamed commit found for {commit}")]
    NoBlameFound { commit: CommitRef },
}

impl Error {
    /// Failures that only cost one file or one line of evidence
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::BlameUnavailable { .. } | Error::LineOutOfRange { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
