// src/classifier.rs
//
// Picks the parent-side lines whose authorship explains a change.
// Deleted lines are charged directly. A block of added lines has no parent
// counterpart, so the line before the block and the first context line
// after it are charged instead.

use crate::model::{DiffLine, Hunk, LineOrigin};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierState {
    #[default]
    Idle,
    InInsertion,
}

impl ClassifierState {
    /// Consumes one diff line. Returns the next state and the parent line
    /// to blame, if any. Line 0 is never returned.
    pub fn step(self, line: &DiffLine) -> (ClassifierState, Option<u32>) {
        let (next, target) = match (line.origin, self) {
            (LineOrigin::Deletion, _) => (ClassifierState::Idle, Some(line.old_lineno)),
            (LineOrigin::Addition, ClassifierState::Idle) => {
                (ClassifierState::InInsertion, Some(line.new_lineno.saturating_sub(1)))
            }
            (LineOrigin::Addition, ClassifierState::InInsertion) => (ClassifierState::InInsertion, None),
            (LineOrigin::Context, ClassifierState::InInsertion) => (ClassifierState::Idle, Some(line.old_lineno)),
            (LineOrigin::Context, ClassifierState::Idle) => (ClassifierState::Idle, None),
        };
        (next, target.filter(|&n| n > 0))
    }
}

/// Classifies one run of lines starting from `state`, appending targets to
/// `out` and returning the state after the last line.
pub fn classify_lines(lines: &[DiffLine], mut state: ClassifierState, out: &mut Vec<u32>) -> ClassifierState {
    for line in lines {
        let (next, target) = state.step(line);
        out.extend(target);
        state = next;
    }
    state
}

/// Blame targets for a whole file, hunks in order. The state starts idle
/// and carries across hunks of the same file only.
pub fn classify_file(hunks: &[Hunk]) -> Vec<u32> {
    let mut targets = Vec::new();
    let mut state = ClassifierState::Idle;
    for hunk in hunks {
        state = classify_lines(&hunk.lines, state, &mut targets);
    }
    targets
}
