// src/frequency.rs

use crate::error::{Error, Result};
use crate::model::CommitRef;
use std::collections::HashMap;

/// Counts how often each commit was blamed.
///
/// Entries keep the order in which their key was first added, so that
/// `max` can break ties in favour of the commit seen first.
#[derive(Debug, Default, Clone)]
pub struct FrequencyTable {
    index: HashMap<CommitRef, usize>,
    entries: Vec<(CommitRef, usize)>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, commit: CommitRef) {
        match self.index.get(&commit) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(commit.clone(), self.entries.len());
                self.entries.push((commit, 1));
            }
        }
    }

    pub fn count(&self, commit: &CommitRef) -> usize {
        self.index.get(commit).map_or(0, |&slot| self.entries[slot].1)
    }

    /// The commit with the highest count; the first-added one wins a tie.
    pub fn max(&self) -> Result<(CommitRef, usize)> {
        let mut best: Option<&(CommitRef, usize)> = None;
        for entry in &self.entries {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(commit, count)| (commit.clone(), *count)).ok_or(Error::Empty)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn entries(&self) -> &[(CommitRef, usize)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(CommitRef, usize)> {
        self.entries
    }
}
