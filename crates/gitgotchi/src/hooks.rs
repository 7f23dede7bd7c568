//! `install`, `uninstall` and the post-commit hook entry point.

use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::Select;
use tracing::warn;

use gitgotchi_core::Clock;
use gitgotchi_git::{
    shell_quote, CommitInspector, HookError, HookInstaller, InstallOutcome, RepoPaths,
};

use crate::config::Settings;
use crate::pet::PetHome;
use crate::render;

/// The line the hook runs, pinned to this binary
fn hook_command() -> Result<String> {
    let exe = std::env::current_exe().context("Failed to locate the gitgotchi binary")?;
    Ok(format!(
        "{} hook post-commit",
        shell_quote(&exe.display().to_string())
    ))
}

pub fn handle_install(repo: &RepoPaths, working_dir: &Path, force: bool, clock: &dyn Clock) -> Result<()> {
    let installer = HookInstaller::for_repo(working_dir, hook_command()?)?;

    let outcome = match installer.install(force) {
        Ok(outcome) => outcome,
        Err(HookError::ForeignHook(path)) if std::io::stdin().is_terminal() => {
            eprintln!(
                "{} A post-commit hook already exists at {}",
                "⚠".bright_yellow(),
                path
            );
            let choice = Select::new()
                .with_prompt("Add gitgotchi to it?")
                .items(&["No, leave it alone", "Yes, append gitgotchi"])
                .default(0)
                .interact()?;
            if choice == 0 {
                eprintln!("Hook left untouched. Nothing installed.");
                return Ok(());
            }
            installer.install(true)?
        }
        Err(e) => return Err(e.into()),
    };

    let home = PetHome::for_git_dir(&repo.git_dir);
    home.hatch_if_absent(clock)?;

    match outcome {
        InstallOutcome::AlreadyInstalled => {
            println!(
                "\n{} {}\n",
                "✓".bright_green(),
                "This repository is already haunted.".green()
            );
        }
        InstallOutcome::Created | InstallOutcome::Appended => {
            println!("\n{}", "🎉 Your repository is now haunted!".green());
            println!("{}\n", "Make a commit to feed your new pet...".dimmed());
        }
    }
    Ok(())
}

/// Whether commits in this repository reach the pet
pub fn hook_installed(working_dir: &Path) -> Result<bool> {
    let installer = HookInstaller::for_repo(working_dir, hook_command()?)?;
    Ok(installer.is_installed()?)
}

pub fn handle_uninstall(working_dir: &Path) -> Result<()> {
    let installer = HookInstaller::for_repo(working_dir, hook_command()?)?;

    if installer.uninstall()? {
        println!("\n{}\n", "👋 The spirits have departed...".yellow());
    } else {
        println!(
            "\n{} {}\n",
            "⚠".bright_yellow(),
            "No gitgotchi hook found in this repository.".dimmed()
        );
    }
    Ok(())
}

/// Runs after every commit. Never fails: a sick pet must not block a commit.
pub fn handle_post_commit(repo: &RepoPaths, working_dir: &Path, settings: &Settings, clock: &dyn Clock) -> Result<()> {
    if let Err(e) = feed_head(repo, working_dir, settings, clock) {
        warn!("Failed to feed pet: {:#}", e);
        if !settings.hook_quiet {
            eprintln!("{}", render::render_error(&format!("{:#}", e)));
        }
    }
    Ok(())
}

fn feed_head(repo: &RepoPaths, working_dir: &Path, settings: &Settings, clock: &dyn Clock) -> Result<()> {
    let report = CommitInspector::new()
        .inspect_head(working_dir)
        .context("Failed to inspect the new commit")?;

    let home = PetHome::for_git_dir(&repo.git_dir);
    let feeding = home.feed_commit(&report, clock)?;

    if settings.hook_quiet {
        return Ok(());
    }

    if feeding.outcome.evolved() {
        print!(
            "{}",
            render::render_evolution(feeding.outcome.form_before, feeding.outcome.form_after)
        );
    }
    print!(
        "{}",
        render::render_commit_response(
            &feeding.stats,
            report.insertions as u64,
            report.deletions as u64
        )
    );
    Ok(())
}
