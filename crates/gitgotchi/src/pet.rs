//! Load, feed and save the pet that lives in one repository.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use gitgotchi_core::{record_commit, Clock, CommitOutcome, PetStatistics};
use gitgotchi_git::CommitReport;
use gitgotchi_logging::{read_history, HistoryLine, HistoryWriter, HISTORY_FILE_NAME};
use gitgotchi_store::{JsonFileStore, PetStore};

pub const LOG_FILE_NAME: &str = "gitgotchi.log";

/// Result of feeding one commit
#[derive(Debug, Clone)]
pub struct Feeding {
    pub stats: PetStatistics,
    pub outcome: CommitOutcome,
    pub hatched: bool,
}

/// The on-disk home of a repository's pet
pub struct PetHome<S: PetStore = JsonFileStore> {
    store: S,
    state_dir: PathBuf,
}

impl PetHome<JsonFileStore> {
    pub fn for_git_dir(git_dir: &Path) -> Self {
        Self::new(
            JsonFileStore::for_git_dir(git_dir),
            JsonFileStore::state_dir(git_dir),
        )
    }
}

impl<S: PetStore> PetHome<S> {
    pub fn new(store: S, state_dir: PathBuf) -> Self {
        Self { store, state_dir }
    }

    pub fn history_path(&self) -> PathBuf {
        self.state_dir.join(HISTORY_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join(LOG_FILE_NAME)
    }

    /// The pet as it looks right now. Nothing is written.
    pub fn status(&self, clock: &dyn Clock) -> Result<PetStatistics> {
        let now = clock.now();
        let (mut stats, _) = self
            .store
            .load_or_hatch(now)
            .context("Failed to load pet state")?;
        stats.refresh(now);
        Ok(stats)
    }

    /// Hatch and save a pet unless one already exists. Returns `true` if hatched.
    pub fn hatch_if_absent(&self, clock: &dyn Clock) -> Result<bool> {
        let now = clock.now();
        let (stats, hatched) = self
            .store
            .load_or_hatch(now)
            .context("Failed to load pet state")?;
        if hatched {
            self.store.save(&stats).context("Failed to save pet state")?;
            self.record(&HistoryLine::Hatched { timestamp: now });
            info!("Hatched a new pet");
        }
        Ok(hatched)
    }

    /// Feed one inspected commit to the pet and persist the result.
    pub fn feed_commit(&self, report: &CommitReport, clock: &dyn Clock) -> Result<Feeding> {
        let now = clock.now();
        let (mut stats, hatched) = self
            .store
            .load_or_hatch(now)
            .context("Failed to load pet state")?;

        let delta = report.delta();
        let outcome = record_commit(&mut stats, &delta, now);

        self.store.save(&stats).context("Failed to save pet state")?;

        if hatched {
            self.record(&HistoryLine::Hatched { timestamp: now });
        }
        self.record(&HistoryLine::Fed {
            timestamp: now,
            commit: report.short_id.clone(),
            summary: report.summary.clone(),
            lines_added: delta.lines_added,
            lines_deleted: delta.lines_deleted,
            conflict: report.is_conflict,
            revert: report.is_revert,
            quality_score: stats.quality_score(),
            mood: stats.current_mood(),
            form: stats.current_form(),
        });
        if outcome.evolved() {
            self.record(&HistoryLine::Evolved {
                timestamp: now,
                from: outcome.form_before,
                to: outcome.form_after,
            });
        }

        info!(
            commit = %report.short_id,
            commits = stats.total_commits,
            mood = %stats.current_mood(),
            form = %stats.current_form(),
            "Fed pet"
        );

        Ok(Feeding {
            stats,
            outcome,
            hatched,
        })
    }

    pub fn history(&self) -> Result<Vec<HistoryLine>> {
        let path = self.history_path();
        read_history(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// History is best effort; the pet state is the source of truth.
    fn record(&self, line: &HistoryLine) {
        let result = HistoryWriter::open(&self.history_path()).and_then(|w| w.append(line));
        if let Err(e) = result {
            warn!("Failed to write history: {}", e);
        }
    }
}
