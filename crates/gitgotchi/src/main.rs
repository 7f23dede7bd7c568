mod config;
mod history;
mod hooks;
mod pet;
mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::warn;

use gitgotchi_core::SystemClock;
use gitgotchi_git::RepoPaths;
use gitgotchi_logging::{init_tracing, LogFormat};

use crate::config::{ConfigFile, Settings};
use crate::pet::PetHome;

#[derive(Parser, Debug)]
#[command(
    name = "gitgotchi",
    about = "👻 GitGotchi - Your haunted git companion",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Working directory (default: current directory)
    #[arg(short = 'd', long, global = true)]
    working_dir: Option<PathBuf>,

    /// Log filter (overrides config), e.g. "debug"
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormatChoice>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show your pet's current status
    Status {
        /// Output the pet as JSON
        #[arg(long)]
        json: bool,
    },

    /// Install the gitgotchi git hook
    Install {
        /// Add gitgotchi to an existing post-commit hook without asking
        #[arg(long)]
        force: bool,
    },

    /// Uninstall the gitgotchi git hook
    Uninstall,

    /// Show what your pet has been fed
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show gitgotchi version
    Version,

    /// Entry points for git hooks
    #[command(hide = true)]
    Hook {
        #[command(subcommand)]
        hook: HookKind,
    },
}

#[derive(Subcommand, Debug)]
enum HookKind {
    PostCommit,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", render::render_error(&format!("{:#}", e)));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Version = cli.command {
        println!(
            "{}",
            format!("GitGotchi v{}", env!("CARGO_PKG_VERSION"))
                .bold()
                .green()
        );
        return Ok(());
    }

    let working_dir = match cli.working_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    // A post-commit hook must never fail the commit it runs after.
    let is_hook = matches!(cli.command, Commands::Hook { .. });

    let repo = match RepoPaths::discover(&working_dir) {
        Ok(repo) => repo,
        Err(e) if is_hook => {
            let defaults = Settings::default();
            let _guard = init_tracing(&defaults.log_level, defaults.log_format, None);
            warn!("Not feeding the pet outside a git repository: {}", e);
            return Ok(());
        }
        Err(e) => {
            return Err(e).context("gitgotchi needs to run inside a git repository");
        }
    };
    let repo_root = repo.work_dir.clone().unwrap_or_else(|| working_dir.clone());

    let (mut settings, config_error) = match load_settings(&repo_root) {
        Ok(settings) => (settings, None),
        Err(e) if is_hook => (Settings::default(), Some(e)),
        Err(e) => return Err(e),
    };
    if let Some(level) = cli.log_level.clone() {
        settings.log_level = level;
    }
    if let Some(format) = cli.log_format {
        settings.log_format = format.into();
    }
    if let Some(color) = settings.color {
        colored::control::set_override(color);
    }

    let home = PetHome::for_git_dir(&repo.git_dir);
    let log_file = is_hook.then(|| home.log_path());
    let _guard = init_tracing(&settings.log_level, settings.log_format, log_file.as_deref());

    if let Some(e) = config_error {
        warn!("Ignoring gitgotchi config, using defaults: {:#}", e);
    }

    let clock = SystemClock;

    match cli.command {
        Commands::Status { json } => {
            let stats = home.status(&clock)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", render::render_pet(&stats, settings.show_stats));
                if !hooks::hook_installed(&working_dir)? {
                    println!(
                        "\n  {}",
                        "Not haunted yet. Run `gitgotchi install` to feed it your commits.".dimmed()
                    );
                }
            }
        }
        Commands::Install { force } => {
            hooks::handle_install(&repo, &working_dir, force, &clock)?;
        }
        Commands::Uninstall => {
            hooks::handle_uninstall(&working_dir)?;
        }
        Commands::History { limit, json } => {
            history::handle_history(&home, limit, json)?;
        }
        Commands::Hook {
            hook: HookKind::PostCommit,
        } => {
            hooks::handle_post_commit(&repo, &working_dir, &settings, &clock)?;
        }
        Commands::Version => {}
    }

    Ok(())
}

fn load_settings(repo_root: &Path) -> Result<Settings> {
    Ok(Settings::from_layers(&[
        ConfigFile::load_global()?,
        ConfigFile::load_project(repo_root)?,
    ]))
}
