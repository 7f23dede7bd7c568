use std::path::Path;

use gitgotchi_core::{MAX_QUALITY, MIN_QUALITY};

const BASELINE: f64 = 70.0;
const SHORT_SUMMARY_CHARS: usize = 10;
const LARGE_DIFF_LINES: u64 = 500;
const HUGE_DIFF_LINES: u64 = 2000;

const CONVENTIONAL_TYPES: &[&str] = &[
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "tests", "build", "ci", "chore",
    "revert",
];

/// The parts of a commit that feed the quality score
#[derive(Debug, Clone, Default)]
pub struct CommitFacts {
    pub summary: String,
    pub lines_changed: u64,
    pub touches_tests: bool,
    pub has_conflict_markers: bool,
    pub is_revert: bool,
}

/// Score a single commit in `[0, 100]`.
pub fn score_commit(facts: &CommitFacts) -> f64 {
    let mut score = BASELINE;

    let summary = facts.summary.trim();
    if summary.chars().count() < SHORT_SUMMARY_CHARS {
        score -= 25.0;
    }
    if is_conventional(summary) {
        score += 10.0;
    }

    if facts.lines_changed > HUGE_DIFF_LINES {
        score -= 30.0;
    } else if facts.lines_changed > LARGE_DIFF_LINES {
        score -= 15.0;
    }

    if facts.touches_tests {
        score += 10.0;
    }
    if facts.has_conflict_markers {
        score -= 30.0;
    }
    if facts.is_revert {
        score -= 10.0;
    }

    score.clamp(MIN_QUALITY, MAX_QUALITY)
}

/// `type: ...`, `type(scope): ...` or `type!: ...`
pub fn is_conventional(summary: &str) -> bool {
    let Some((head, rest)) = summary.split_once(':') else {
        return false;
    };
    if rest.trim().is_empty() {
        return false;
    }

    let head = head.strip_suffix('!').unwrap_or(head);
    let kind = match head.split_once('(') {
        Some((kind, scope)) => {
            if !scope.ends_with(')') || scope.len() < 2 {
                return false;
            }
            kind
        }
        None => head,
    };

    CONVENTIONAL_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(kind))
}

/// Heuristic for test sources across common layouts
pub fn is_test_path(path: &Path) -> bool {
    let in_test_dir = path.components().any(|c| {
        matches!(
            c.as_os_str().to_str(),
            Some("test" | "tests" | "__tests__" | "spec")
        )
    });
    if in_test_dir {
        return true;
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    name.starts_with("test_")
        || name.contains("_test.")
        || name.contains(".test.")
        || name.contains("_spec.")
        || name.contains(".spec.")
}
