use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::commit::{open_repo, GitError};

pub const HOOK_NAME: &str = "post-commit";
const BLOCK_START: &str = "# >>> gitgotchi >>>";
const BLOCK_END: &str = "# <<< gitgotchi <<<";
const SHEBANG: &str = "#!/bin/sh";

#[derive(Error, Debug)]
pub enum HookError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error("Failed to write hook {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("A post-commit hook already exists at {0}; use --force to add gitgotchi to it")]
    ForeignHook(String),
}

/// Result of an install call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Created,
    Appended,
    AlreadyInstalled,
}

/// Installs and removes the post-commit hook that feeds the pet
pub struct HookInstaller {
    hooks_dir: PathBuf,
    command: String,
}

impl HookInstaller {
    /// `command` is the shell line the hook runs after each commit.
    pub fn new(hooks_dir: PathBuf, command: impl Into<String>) -> Self {
        Self {
            hooks_dir,
            command: command.into(),
        }
    }

    /// Resolve the hooks directory for the repository around `working_dir`,
    /// honouring `core.hooksPath`.
    pub fn for_repo(working_dir: &Path, command: impl Into<String>) -> Result<Self, HookError> {
        Ok(Self::new(hooks_dir(working_dir)?, command))
    }

    pub fn hook_path(&self) -> PathBuf {
        self.hooks_dir.join(HOOK_NAME)
    }

    pub fn is_installed(&self) -> Result<bool, HookError> {
        Ok(self
            .read_existing()?
            .is_some_and(|content| content.contains(BLOCK_START)))
    }

    pub fn install(&self, force: bool) -> Result<InstallOutcome, HookError> {
        let path = self.hook_path();
        let existing = self.read_existing()?;

        let (content, outcome) = match existing {
            Some(content) if content.contains(BLOCK_START) => {
                debug!(path = %path.display(), "Hook already installed");
                return Ok(InstallOutcome::AlreadyInstalled);
            }
            Some(content) if !content.trim().is_empty() => {
                if !force {
                    return Err(HookError::ForeignHook(path.display().to_string()));
                }
                let mut content = content;
                if !content.ends_with('\n') {
                    content.push('\n');
                }
                content.push('\n');
                content.push_str(&self.block());
                (content, InstallOutcome::Appended)
            }
            _ => (
                format!("{}\n\n{}", SHEBANG, self.block()),
                InstallOutcome::Created,
            ),
        };

        fs::create_dir_all(&self.hooks_dir).map_err(|e| self.io_error(&self.hooks_dir, e))?;
        fs::write(&path, content).map_err(|e| self.io_error(&path, e))?;
        make_executable(&path).map_err(|e| self.io_error(&path, e))?;

        info!(path = %path.display(), ?outcome, "Installed hook");
        Ok(outcome)
    }

    /// Remove the gitgotchi block. Returns `false` if there was nothing to remove.
    pub fn uninstall(&self) -> Result<bool, HookError> {
        let path = self.hook_path();
        let Some(content) = self.read_existing()? else {
            return Ok(false);
        };
        if !content.contains(BLOCK_START) {
            return Ok(false);
        }

        let remaining = strip_block(&content);
        let only_shebang = remaining
            .lines()
            .all(|line| line.trim().is_empty() || line.trim() == SHEBANG);

        if only_shebang {
            fs::remove_file(&path).map_err(|e| self.io_error(&path, e))?;
        } else {
            fs::write(&path, remaining).map_err(|e| self.io_error(&path, e))?;
        }

        info!(path = %path.display(), removed_file = only_shebang, "Uninstalled hook");
        Ok(true)
    }

    fn block(&self) -> String {
        format!("{}\n{} || true\n{}\n", BLOCK_START, self.command, BLOCK_END)
    }

    fn read_existing(&self) -> Result<Option<String>, HookError> {
        let path = self.hook_path();
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(&path, e)),
        }
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> HookError {
        HookError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Quote a path for a POSIX shell line
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

fn hooks_dir(working_dir: &Path) -> Result<PathBuf, HookError> {
    let repo = open_repo(working_dir)?;
    let configured = repo
        .config()
        .and_then(|config| config.get_path("core.hooksPath"))
        .ok();

    let dir = match configured {
        Some(path) if path.is_absolute() => path,
        Some(path) => repo.workdir().unwrap_or_else(|| repo.path()).join(path),
        None => repo.path().join("hooks"),
    };
    Ok(dir)
}

fn strip_block(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut inside = false;
    for line in content.lines() {
        if line.trim() == BLOCK_START {
            inside = true;
            continue;
        }
        if line.trim() == BLOCK_END {
            inside = false;
            continue;
        }
        if !inside {
            out.push_str(line);
            out.push('\n');
        }
    }
    let trimmed = out.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}\n", trimmed)
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o755);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
