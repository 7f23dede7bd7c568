use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::form::{evaluate_form, Form};
use crate::mood::{evaluate_mood, Mood};

/// Lowest allowed quality score
pub const MIN_QUALITY: f64 = 0.0;
/// Highest allowed quality score
pub const MAX_QUALITY: f64 = 100.0;
/// Quality score of a freshly hatched pet
pub const DEFAULT_QUALITY: f64 = 50.0;

/// Per-commit observation supplied by the commit-ingestion side.
///
/// Counters are increments. `quality_score` replaces the stored score
/// when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitDelta {
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub conflicts: u64,
    pub reverts: u64,
    pub quality_score: Option<f64>,
}

/// Everything the pet knows about its repository.
///
/// `current_mood` and `current_form` are caches of the evaluators and are only
/// written through [`PetStatistics::feed`], [`PetStatistics::update_form`] and
/// [`PetStatistics::refresh`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetStatistics {
    #[serde(default)]
    pub total_commits: u64,
    #[serde(default)]
    pub lines_added: u64,
    #[serde(default)]
    pub lines_deleted: u64,
    #[serde(default)]
    pub merge_conflicts: u64,
    #[serde(default)]
    pub reverts: u64,
    #[serde(default = "default_quality")]
    quality_score: f64,
    last_fed: DateTime<Utc>,
    #[serde(default)]
    current_mood: Mood,
    #[serde(default)]
    current_form: Form,
}

fn default_quality() -> f64 {
    DEFAULT_QUALITY
}

impl PetStatistics {
    /// Hatch a new pet at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            total_commits: 0,
            lines_added: 0,
            lines_deleted: 0,
            merge_conflicts: 0,
            reverts: 0,
            quality_score: DEFAULT_QUALITY,
            last_fed: now,
            current_mood: Mood::Neutral,
            current_form: Form::Egg,
        }
    }

    pub fn quality_score(&self) -> f64 {
        self.quality_score
    }

    pub fn last_fed(&self) -> DateTime<Utc> {
        self.last_fed
    }

    pub fn current_mood(&self) -> Mood {
        self.current_mood
    }

    pub fn current_form(&self) -> Form {
        self.current_form
    }

    /// Store a quality observation, clamped into `[0, 100]`.
    ///
    /// NaN observations are dropped and the previous score is kept.
    pub fn set_quality_score(&mut self, score: f64) {
        if score.is_nan() {
            warn!("Ignoring NaN quality score");
            return;
        }
        self.quality_score = score.clamp(MIN_QUALITY, MAX_QUALITY);
    }

    /// Apply one commit's worth of counter increments.
    ///
    /// Counts the commit itself, adds every delta and overwrites the quality
    /// score. Derived fields are left untouched.
    pub fn apply_delta(&mut self, delta: &CommitDelta) {
        self.total_commits = self.total_commits.saturating_add(1);
        self.lines_added = self.lines_added.saturating_add(delta.lines_added);
        self.lines_deleted = self.lines_deleted.saturating_add(delta.lines_deleted);
        self.merge_conflicts = self.merge_conflicts.saturating_add(delta.conflicts);
        self.reverts = self.reverts.saturating_add(delta.reverts);
        if let Some(score) = delta.quality_score {
            self.set_quality_score(score);
        }
    }

    /// Record a feeding at `now` and re-derive the mood.
    ///
    /// Never recomputes the form. A `now` older than the stored feeding time
    /// leaves `last_fed` where it is.
    pub fn feed(&mut self, now: DateTime<Utc>) {
        if now > self.last_fed {
            self.last_fed = now;
        } else if now < self.last_fed {
            warn!(
                last_fed = %self.last_fed,
                now = %now,
                "Clock is behind last feeding, keeping stored timestamp"
            );
        }
        self.current_mood = evaluate_mood(self, now);
    }

    /// Re-derive the form from the cumulative counters.
    pub fn update_form(&mut self) {
        self.current_form = evaluate_form(self);
    }

    /// Re-derive both cached fields without feeding.
    pub fn refresh(&mut self, now: DateTime<Utc>) {
        self.current_mood = evaluate_mood(self, now);
        self.current_form = evaluate_form(self);
    }

    pub fn total_lines_changed(&self) -> u64 {
        self.lines_added.saturating_add(self.lines_deleted)
    }
}
