use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use git2::{Repository, Signature};
use tempfile::TempDir;

/// Helper: a repository with one commit on HEAD.
fn repo_with_commit() -> TempDir {
    let dir = TempDir::new().unwrap();
    let repo = Repository::init(dir.path()).unwrap();

    fs::write(dir.path().join("README.md"), "# haunted\n").unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("README.md")).unwrap();
    index.write().unwrap();

    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::now("Test Author", "test@example.com").unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "docs: add readme", &tree, &[])
        .unwrap();
    dir
}

fn gitgotchi(working_dir: &Path, config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gitgotchi"))
        .arg("-d")
        .arg(working_dir)
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_hook_feeds_pet_despite_bad_project_config() {
    let repo = repo_with_commit();
    let config_home = TempDir::new().unwrap();
    fs::write(repo.path().join("gitgotchi.toml"), "hunger_hours = 12\n").unwrap();

    let out = gitgotchi(repo.path(), config_home.path(), &["hook", "post-commit"]);
    let stderr = String::from_utf8_lossy(&out.stderr);

    assert!(out.status.success(), "hook failed: {stderr}");
    assert!(!stderr.contains("The spirits are restless"), "{stderr}");
    assert!(repo.path().join(".git/gitgotchi/pet.json").exists());
    assert!(repo.path().join(".git/gitgotchi/history.jsonl").exists());
}

#[test]
fn test_hook_outside_a_repository_succeeds() {
    let dir = TempDir::new().unwrap();
    let config_home = TempDir::new().unwrap();

    let out = gitgotchi(dir.path(), config_home.path(), &["hook", "post-commit"]);
    assert!(
        out.status.success(),
        "hook failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(!dir.path().join(".git").exists());
}

#[test]
fn test_status_still_reports_bad_config() {
    let repo = repo_with_commit();
    let config_home = TempDir::new().unwrap();
    fs::write(repo.path().join("gitgotchi.toml"), "hunger_hours = 12\n").unwrap();

    let out = gitgotchi(repo.path(), config_home.path(), &["status"]);
    let stderr = String::from_utf8_lossy(&out.stderr);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr.contains("unknown field"), "{stderr}");
}

#[test]
fn test_status_json_after_hook() {
    let repo = repo_with_commit();
    let config_home = TempDir::new().unwrap();

    let hook = gitgotchi(repo.path(), config_home.path(), &["hook", "post-commit"]);
    assert!(hook.status.success());

    let out = gitgotchi(repo.path(), config_home.path(), &["status", "--json"]);
    assert!(out.status.success());
    let pet: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(pet["total_commits"], 1);
    assert_eq!(pet["current_form"], "egg");
}
