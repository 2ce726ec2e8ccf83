// tests/git_attribution.rs
//
// End-to-end attribution against throwaway repositories.

use git2::{IndexAddOption, Oid, Repository, Signature};
use std::fs;
use tempfile::TempDir;
use vcc_finder::blame::{Backend, BlameView, DiffSettings};
use vcc_finder::model::{ChangeKind, LineOrigin};
use vcc_finder::{attribute, attribute_detailed, AttributionConfig, CommitRef, Error, GitBackend};

// ============================================================================
// TEST SETUP
// ============================================================================

struct TestRepo {
    dir: TempDir,
    repo: Repository,
}

impl TestRepo {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let repo = Repository::init(dir.path()).expect("Failed to init repo");
        Self { dir, repo }
    }

    fn write(&self, path: &str, contents: &str) {
        let full = self.dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("Failed to create dir");
        }
        fs::write(full, contents).expect("Failed to write file");
    }

    fn remove(&self, path: &str) {
        fs::remove_file(self.dir.path().join(path)).expect("Failed to remove file");
    }

    /// Stages the whole working tree, deletions included, and commits it on HEAD.
    fn commit(&self, message: &str) -> Oid {
        let mut index = self.repo.index().expect("Failed to get index");
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None).expect("Failed to add files");
        index.update_all(["*"].iter(), None).expect("Failed to update index");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let sig = Signature::now("Test User", "test@example.com").expect("Failed to create signature");
        let parent = self.repo.head().ok().and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    fn backend(&self) -> GitBackend {
        GitBackend::open(self.dir.path()).expect("Failed to open backend")
    }
}

fn numbered_lines(range: std::ops::RangeInclusive<u32>) -> String {
    range.map(|n| format!("int line_{} = {};\n", n, n)).collect()
}

fn without_lines(total: u32, drop: &[u32]) -> String {
    (1..=total)
        .filter(|n| !drop.contains(n))
        .map(|n| format!("int line_{} = {};\n", n, n))
        .collect()
}

fn config() -> AttributionConfig {
    AttributionConfig::default()
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn deleted_lines_blame_their_author() {
    let t = TestRepo::new();
    t.write("util.c", &numbered_lines(1..=15));
    let origin = t.commit("add util");

    t.write("util.c", &without_lines(15, &[10, 11, 12]));
    let fix = t.commit("fix util");

    let report = attribute_detailed(&t.backend(), &fix.to_string(), &config()).unwrap();
    assert_eq!(report.blamed, CommitRef::from(origin));
    assert_eq!(report.votes, 3);
    assert_eq!(report.targets, 3);
    assert_eq!(report.parent, Some(CommitRef::from(origin)));
}

#[test]
fn readme_addition_does_not_change_result() {
    let t = TestRepo::new();
    t.write("util.c", &numbered_lines(1..=15));
    t.write("README.md", "# util\n");
    let origin = t.commit("add util");

    t.write("README.md", "# util\n\nNow fixed.\n");
    let docs = t.commit("docs");

    t.write("util.c", &without_lines(15, &[10, 11, 12]));
    t.write("README.md", "# util\n\nNow fixed.\nReally.\n");
    let fix = t.commit("fix util");

    let report = attribute_detailed(&t.backend(), &fix.to_string(), &config()).unwrap();
    assert_eq!(report.blamed, CommitRef::from(origin));
    assert_eq!(report.tally, vec![(CommitRef::from(origin), 3)]);
    assert_ne!(report.blamed, CommitRef::from(docs));
}

#[test]
fn tie_between_files_goes_to_first_file() {
    let t = TestRepo::new();
    t.write("a.c", &numbered_lines(1..=6));
    let x = t.commit("add a");
    t.write("b.c", &numbered_lines(1..=6));
    let y = t.commit("add b");

    t.write("a.c", &without_lines(6, &[2, 3]));
    t.write("b.c", &without_lines(6, &[4, 5]));
    let fix = t.commit("fix both");

    let report = attribute_detailed(&t.backend(), &fix.to_string(), &config()).unwrap();
    assert_eq!(report.tally, vec![(CommitRef::from(x), 2), (CommitRef::from(y), 2)]);
    assert_eq!(report.blamed, CommitRef::from(x));
}

#[test]
fn majority_wins_over_first_seen() {
    let t = TestRepo::new();
    t.write("a.c", &numbered_lines(1..=6));
    t.commit("add a");
    t.write("b.c", &numbered_lines(1..=6));
    let y = t.commit("add b");

    t.write("a.c", &without_lines(6, &[2]));
    t.write("b.c", &without_lines(6, &[1, 2, 3]));
    let fix = t.commit("fix both");

    assert_eq!(attribute(&t.backend(), &fix.to_string(), &config()).unwrap(), CommitRef::from(y));
}

#[test]
fn root_commit_has_no_blame() {
    let t = TestRepo::new();
    t.write("main.c", &numbered_lines(1..=3));
    let root = t.commit("initial");

    let err = attribute(&t.backend(), &root.to_string(), &config()).unwrap_err();
    assert!(matches!(err, Error::NoBlameFound { .. }));
}

#[test]
fn only_new_files_have_no_blame() {
    let t = TestRepo::new();
    t.write("main.c", &numbered_lines(1..=3));
    t.commit("initial");
    t.write("extra.c", &numbered_lines(1..=5));
    let fix = t.commit("add extra");

    let err = attribute(&t.backend(), &fix.to_string(), &config()).unwrap_err();
    assert!(matches!(err, Error::NoBlameFound { .. }));
}

#[test]
fn insertion_blames_surrounding_lines() {
    let t = TestRepo::new();
    t.write("lib.rs", &numbered_lines(1..=10));
    let base = t.commit("base");

    // line 5 and line 6 are rewritten by a later commit
    let mut lines: Vec<String> = (1..=10).map(|n| format!("int line_{} = {};\n", n, n)).collect();
    lines[4] = "int line_5 = 50;\n".to_string();
    lines[5] = "int line_6 = 60;\n".to_string();
    t.write("lib.rs", &lines.concat());
    let touched = t.commit("touch 5 and 6");

    // the fix only inserts between line 5 and line 6
    lines.insert(5, "check();\n".to_string());
    lines.insert(6, "check_again();\n".to_string());
    t.write("lib.rs", &lines.concat());
    let fix = t.commit("insert checks");

    let report = attribute_detailed(&t.backend(), &fix.to_string(), &config()).unwrap();
    assert_eq!(report.targets, 2);
    assert_eq!(report.tally, vec![(CommitRef::from(touched), 2)]);
    assert_ne!(report.blamed, CommitRef::from(base));
}

#[test]
fn fix_commit_is_never_its_own_answer() {
    let t = TestRepo::new();
    t.write("util.c", &numbered_lines(1..=8));
    t.commit("add util");
    t.write("util.c", &without_lines(8, &[4]));
    let fix = t.commit("fix");

    let blamed = attribute(&t.backend(), &fix.to_string(), &config()).unwrap();
    assert_ne!(blamed, CommitRef::from(fix));
}

#[test]
fn revspec_names_the_fix_commit() {
    let t = TestRepo::new();
    t.write("util.c", &numbered_lines(1..=8));
    let origin = t.commit("add util");
    t.write("util.c", &without_lines(8, &[1]));
    t.commit("fix");

    assert_eq!(attribute(&t.backend(), "HEAD", &config()).unwrap(), CommitRef::from(origin));
}

#[test]
fn unknown_commit_is_a_repository_error() {
    let t = TestRepo::new();
    t.write("util.c", "int x;\n");
    t.commit("initial");

    let err = attribute(&t.backend(), "0123456789abcdef0123456789abcdef01234567", &config()).unwrap_err();
    assert!(matches!(err, Error::Repository(_)));
}

#[test]
fn renamed_file_is_blamed_on_old_path() {
    let t = TestRepo::new();
    t.write("old_name.c", &numbered_lines(1..=20));
    let origin = t.commit("add");

    t.remove("old_name.c");
    t.write("new_name.c", &without_lines(20, &[7]));
    let fix = t.commit("rename and fix");

    let report = attribute_detailed(&t.backend(), &fix.to_string(), &config()).unwrap();
    assert_eq!(report.blamed, CommitRef::from(origin));
    assert_eq!(report.targets, 1);
}

#[test]
fn disabled_rename_detection_blames_whole_deleted_file() {
    let t = TestRepo::new();
    t.write("old_name.c", &numbered_lines(1..=20));
    t.commit("add");

    t.remove("old_name.c");
    t.write("new_name.c", &without_lines(20, &[7]));
    let fix = t.commit("rename and fix");

    let mut config = config();
    config.diff.detect_renames = false;
    let report = attribute_detailed(&t.backend(), &fix.to_string(), &config).unwrap();
    assert_eq!(report.targets, 20);
}

#[test]
fn diff_is_materialised_with_line_numbers() {
    let t = TestRepo::new();
    t.write("util.c", &numbered_lines(1..=15));
    t.commit("add util");
    t.write("util.c", &without_lines(15, &[10, 11, 12]));
    t.write("notes.txt", "hello\n");
    let fix = t.commit("fix");

    let diff = t.backend().commit_diff(&fix.to_string(), &DiffSettings::default()).unwrap();
    assert_eq!(diff.fix, CommitRef::from(fix));
    assert_eq!(diff.files.len(), 2);

    let notes = diff.files.iter().find(|f| f.new_path.as_deref() == Some("notes.txt")).unwrap();
    assert_eq!(notes.kind, ChangeKind::Added);

    let util = diff.files.iter().find(|f| f.old_path.as_deref() == Some("util.c")).unwrap();
    assert_eq!(util.kind, ChangeKind::Modified);
    let deleted: Vec<u32> = util
        .hunks
        .iter()
        .flat_map(|h| &h.lines)
        .filter(|l| l.origin == LineOrigin::Deletion)
        .map(|l| l.old_lineno)
        .collect();
    assert_eq!(deleted, vec![10, 11, 12]);
}

#[test]
fn blame_view_reports_out_of_range_lines() {
    let t = TestRepo::new();
    t.write("util.c", &numbered_lines(1..=4));
    let origin = t.commit("add util");

    let backend = t.backend();
    let view = backend.open_blame("util.c", &CommitRef::from(origin)).unwrap();
    assert_eq!(view.line_count(), 4);
    assert_eq!(view.commit_for_line(4).unwrap(), CommitRef::from(origin));
    assert!(matches!(view.commit_for_line(5), Err(Error::LineOutOfRange { line: 5, .. })));

    let missing = backend.open_blame("nope.c", &CommitRef::from(origin));
    assert!(matches!(missing, Err(Error::BlameUnavailable { .. })));
}
