use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::form::Form;
use crate::mood::Mood;
use crate::stats::{CommitDelta, PetStatistics};

/// What changed when a commit reached the pet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommitOutcome {
    pub mood_before: Mood,
    pub mood_after: Mood,
    pub form_before: Form,
    pub form_after: Form,
}

impl CommitOutcome {
    pub fn evolved(&self) -> bool {
        self.form_before != self.form_after
    }

    pub fn mood_changed(&self) -> bool {
        self.mood_before != self.mood_after
    }
}

/// Feed the pet one commit.
///
/// Applies the counter deltas, feeds at `now` and then re-derives the form.
/// This is the full per-commit sequence; `feed` alone only resets hunger.
pub fn record_commit(
    stats: &mut PetStatistics,
    delta: &CommitDelta,
    now: DateTime<Utc>,
) -> CommitOutcome {
    let mood_before = stats.current_mood();
    let form_before = stats.current_form();

    stats.apply_delta(delta);
    stats.feed(now);
    stats.update_form();

    let outcome = CommitOutcome {
        mood_before,
        mood_after: stats.current_mood(),
        form_before,
        form_after: stats.current_form(),
    };

    if outcome.evolved() {
        info!(from = %form_before, to = %outcome.form_after, "Pet evolved");
    }
    if outcome.mood_changed() {
        info!(from = %mood_before, to = %outcome.mood_after, "Pet mood changed");
    }

    outcome
}
