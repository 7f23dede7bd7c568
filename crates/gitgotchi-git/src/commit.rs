use std::path::{Path, PathBuf};

use git2::{Commit, DiffOptions, Repository};
use gitgotchi_core::CommitDelta;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::quality::{is_test_path, score_commit, CommitFacts};

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository: {0}")]
    NotARepo(String),

    #[error("Git operation failed: {0}")]
    GitOperationFailed(#[from] git2::Error),

    #[error("No commits in repository")]
    NoCommits,
}

/// Locations of a discovered repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPaths {
    /// The `.git` directory (or the repository itself when bare)
    pub git_dir: PathBuf,
    /// Root of the working tree, `None` for bare repositories
    pub work_dir: Option<PathBuf>,
}

impl RepoPaths {
    pub fn discover(start: &Path) -> Result<Self, GitError> {
        let repo = open_repo(start)?;
        Ok(Self {
            git_dir: repo.path().to_path_buf(),
            work_dir: repo.workdir().map(Path::to_path_buf),
        })
    }
}

pub(crate) fn open_repo(start: &Path) -> Result<Repository, GitError> {
    Repository::discover(start).map_err(|e| {
        if e.code() == git2::ErrorCode::NotFound {
            GitError::NotARepo(start.display().to_string())
        } else {
            GitError::GitOperationFailed(e)
        }
    })
}

/// Everything gitgotchi learns from one commit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitReport {
    pub id: String,
    pub short_id: String,
    pub summary: String,
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
    pub is_merge: bool,
    pub is_conflict: bool,
    pub is_revert: bool,
    pub touches_tests: bool,
    pub has_conflict_markers: bool,
    pub quality_score: f64,
}

impl CommitReport {
    /// Counter increments for the pet
    pub fn delta(&self) -> CommitDelta {
        CommitDelta {
            lines_added: self.insertions as u64,
            lines_deleted: self.deletions as u64,
            conflicts: u64::from(self.is_conflict),
            reverts: u64::from(self.is_revert),
            quality_score: Some(self.quality_score),
        }
    }
}

/// Reads commits out of a repository
#[derive(Debug, Default)]
pub struct CommitInspector;

impl CommitInspector {
    pub fn new() -> Self {
        Self
    }

    /// Inspect the commit HEAD points at
    pub fn inspect_head(&self, working_dir: &Path) -> Result<CommitReport, GitError> {
        let repo = open_repo(working_dir)?;

        let head = match repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                return Err(GitError::NoCommits)
            }
            Err(e) => return Err(GitError::GitOperationFailed(e)),
        };
        let commit = head.peel_to_commit()?;

        self.inspect(&repo, &commit)
    }

    /// Inspect a specific commit, diffed against its first parent
    pub fn inspect(&self, repo: &Repository, commit: &Commit<'_>) -> Result<CommitReport, GitError> {
        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };

        let mut opts = DiffOptions::new();
        let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;
        let stats = diff.stats()?;

        let touches_tests = diff.deltas().any(|delta| {
            delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .is_some_and(is_test_path)
        });

        let mut has_conflict_markers = false;
        diff.print(git2::DiffFormat::Patch, |_delta, _hunk, line| {
            if line.origin() == '+' && is_conflict_marker(line.content()) {
                has_conflict_markers = true;
            }
            true
        })?;

        let message = commit.message().unwrap_or("");
        let summary = commit.summary().unwrap_or("").to_string();
        let is_merge = commit.parent_count() > 1;
        let is_revert = is_revert_message(message);
        let is_conflict = has_conflict_markers || (is_merge && mentions_conflict(message));

        let id = commit.id().to_string();
        let short_id = id.chars().take(7).collect();

        let lines_changed = (stats.insertions() + stats.deletions()) as u64;
        let quality_score = score_commit(&CommitFacts {
            summary: summary.clone(),
            lines_changed,
            touches_tests,
            has_conflict_markers,
            is_revert,
        });

        let report = CommitReport {
            id,
            short_id,
            summary,
            files_changed: stats.files_changed(),
            insertions: stats.insertions(),
            deletions: stats.deletions(),
            is_merge,
            is_conflict,
            is_revert,
            touches_tests,
            has_conflict_markers,
            quality_score,
        };

        debug!(
            commit = %report.short_id,
            insertions = report.insertions,
            deletions = report.deletions,
            conflict = report.is_conflict,
            revert = report.is_revert,
            quality = report.quality_score,
            "Inspected commit"
        );

        Ok(report)
    }
}

/// `git revert` messages start with `Revert "` and carry a trailer
pub fn is_revert_message(message: &str) -> bool {
    message.starts_with("Revert \"") || message.contains("This reverts commit")
}

/// Merge messages record resolved conflicts in a `Conflicts:` section
pub fn mentions_conflict(message: &str) -> bool {
    message.to_ascii_lowercase().contains("conflict")
}

const CONFLICT_MARKERS: [&[u8]; 2] = [b"<<<<<<<", b">>>>>>>"];

/// A marker followed by a label or the end of the line
fn is_conflict_marker(content: &[u8]) -> bool {
    CONFLICT_MARKERS.iter().any(|marker| {
        content
            .strip_prefix(*marker)
            .is_some_and(|rest| matches!(rest.first(), None | Some(b' ' | b'\n' | b'\r')))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revert_detection() {
        assert!(is_revert_message(
            "Revert \"add cache\"\n\nThis reverts commit 1234abcd."
        ));
        assert!(is_revert_message("undo cache\n\nThis reverts commit 1234abcd."));
        assert!(!is_revert_message("Reverted nothing, just a word"));
    }

    #[test]
    fn test_conflict_detection() {
        assert!(mentions_conflict(
            "Merge branch 'dev'\n\n# Conflicts:\n#\tsrc/lib.rs\n"
        ));
        assert!(mentions_conflict("Merge: resolve CONFLICT in parser"));
        assert!(!mentions_conflict("Merge branch 'dev'"));
    }

    #[test]
    fn test_conflict_markers() {
        assert!(is_conflict_marker(b"<<<<<<< HEAD\n"));
        assert!(is_conflict_marker(b">>>>>>> feature\n"));
        assert!(!is_conflict_marker(b"let x = a << b;\n"));
        assert!(is_conflict_marker(b"<<<<<<<\n"));
        assert!(is_conflict_marker(b">>>>>>>\r\n"));
        assert!(is_conflict_marker(b">>>>>>>"));
        assert!(!is_conflict_marker(b"<<<<<<<< eight\n"));
        assert!(!is_conflict_marker(b"=======\n"));
    }

    #[test]
    fn test_report_delta() {
        let report = CommitReport {
            insertions: 14,
            deletions: 3,
            is_conflict: true,
            is_revert: false,
            quality_score: 42.0,
            ..Default::default()
        };
        let delta = report.delta();
        assert_eq!(delta.lines_added, 14);
        assert_eq!(delta.lines_deleted, 3);
        assert_eq!(delta.conflicts, 1);
        assert_eq!(delta.reverts, 0);
        assert_eq!(delta.quality_score, Some(42.0));
    }
}
