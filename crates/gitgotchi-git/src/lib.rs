//! # gitgotchi-git
//!
//! Git operations for gitgotchi.
//!
//! This crate turns commits into pet food and manages the hook that delivers
//! it.
//!
//! ## Overview
//!
//! After each commit the post-commit hook runs `gitgotchi hook post-commit`,
//! which inspects HEAD and reports:
//! - How many lines were added and removed
//! - Whether the commit resolved (or left behind) a merge conflict
//! - Whether the commit is a revert
//! - A quality score for the commit
//!
//! ## Key Types
//!
//! - [`CommitInspector`] - Reads a commit and builds a [`CommitReport`]
//! - [`HookInstaller`] - Installs and removes the post-commit hook
//! - [`RepoPaths`] - Git dir and working tree of a discovered repository
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gitgotchi_git::CommitInspector;
//!
//! let report = CommitInspector::new().inspect_head(Path::new("."))?;
//! let delta = report.delta();
//! ```

mod commit;
mod hooks;
mod quality;

pub use commit::{
    is_revert_message, mentions_conflict, CommitInspector, CommitReport, GitError, RepoPaths,
};
pub use hooks::{shell_quote, HookError, HookInstaller, InstallOutcome, HOOK_NAME};
pub use quality::{is_conventional, is_test_path, score_commit, CommitFacts};
