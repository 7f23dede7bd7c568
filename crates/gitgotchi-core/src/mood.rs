use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::stats::PetStatistics;
use crate::UnknownVariant;

/// Longest a pet can go unfed before it starts dying (7 days)
pub const DYING_AFTER_HOURS: i64 = 168;
/// Longest a pet can go unfed before it gets hungry
pub const HUNGRY_AFTER_HOURS: i64 = 24;
/// Quality below this possesses the pet
pub const POSSESSED_BELOW_QUALITY: f64 = 30.0;
/// More conflicts than this make the pet sick
pub const SICK_ABOVE_CONFLICTS: u64 = 5;
pub const ECSTATIC_ABOVE_QUALITY: f64 = 80.0;
pub const HAPPY_ABOVE_QUALITY: f64 = 60.0;

/// The pet's current emotional state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Ecstatic,
    Happy,
    #[default]
    Neutral,
    Hungry,
    Sick,
    Dying,
    Possessed,
}

impl Mood {
    pub const ALL: [Mood; 7] = [
        Mood::Ecstatic,
        Mood::Happy,
        Mood::Neutral,
        Mood::Hungry,
        Mood::Sick,
        Mood::Dying,
        Mood::Possessed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Ecstatic => "ecstatic",
            Mood::Happy => "happy",
            Mood::Neutral => "neutral",
            Mood::Hungry => "hungry",
            Mood::Sick => "sick",
            Mood::Dying => "dying",
            Mood::Possessed => "possessed",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant::new("mood", s))
    }
}

/// Snapshot of the inputs a mood rule may look at
#[derive(Debug, Clone, Copy)]
pub struct MoodInputs {
    pub since_fed: TimeDelta,
    pub quality_score: f64,
    pub merge_conflicts: u64,
}

impl MoodInputs {
    pub fn from_stats(stats: &PetStatistics, now: DateTime<Utc>) -> Self {
        Self {
            since_fed: now - stats.last_fed(),
            quality_score: stats.quality_score(),
            merge_conflicts: stats.merge_conflicts,
        }
    }
}

/// One entry of the mood priority chain
pub struct MoodRule {
    pub name: &'static str,
    pub mood: Mood,
    pub applies: fn(&MoodInputs) -> bool,
}

/// Mood rules in priority order. The first rule that applies wins; the last
/// rule always applies.
pub const MOOD_RULES: &[MoodRule] = &[
    MoodRule {
        name: "starving",
        mood: Mood::Dying,
        applies: |i| i.since_fed > TimeDelta::hours(DYING_AFTER_HOURS),
    },
    MoodRule {
        name: "cursed code",
        mood: Mood::Possessed,
        applies: |i| i.quality_score < POSSESSED_BELOW_QUALITY,
    },
    MoodRule {
        name: "merge conflicts",
        mood: Mood::Sick,
        applies: |i| i.merge_conflicts > SICK_ABOVE_CONFLICTS,
    },
    MoodRule {
        name: "missed a meal",
        mood: Mood::Hungry,
        applies: |i| i.since_fed > TimeDelta::hours(HUNGRY_AFTER_HOURS),
    },
    MoodRule {
        name: "great code",
        mood: Mood::Ecstatic,
        applies: |i| i.quality_score > ECSTATIC_ABOVE_QUALITY,
    },
    MoodRule {
        name: "good code",
        mood: Mood::Happy,
        applies: |i| i.quality_score > HAPPY_ABOVE_QUALITY,
    },
    MoodRule {
        name: "baseline",
        mood: Mood::Neutral,
        applies: |_| true,
    },
];

/// Compute the mood for `stats` as seen at `now`.
pub fn evaluate_mood(stats: &PetStatistics, now: DateTime<Utc>) -> Mood {
    mood_for(&MoodInputs::from_stats(stats, now))
}

pub fn mood_for(inputs: &MoodInputs) -> Mood {
    let rule = MOOD_RULES.iter().find(|rule| (rule.applies)(inputs));
    match rule {
        Some(rule) => {
            debug!(rule = rule.name, mood = %rule.mood, "Evaluated mood");
            rule.mood
        }
        None => Mood::Neutral,
    }
}
