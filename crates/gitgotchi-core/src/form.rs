use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::stats::PetStatistics;
use crate::UnknownVariant;

/// A pet stays an egg up to and including this many commits
pub const EGG_MAX_COMMITS: u64 = 10;
/// More reverts than this turn the pet into a zombie
pub const ZOMBIE_ABOVE_REVERTS: u64 = 20;
pub const WRAITH_ABOVE_COMMITS: u64 = 100;
/// Commits needed to leave the ghost stage
pub const MATURE_ABOVE_COMMITS: u64 = 50;
/// Quality needed for the wraith and angel forms
pub const VIRTUOUS_ABOVE_QUALITY: f64 = 70.0;

/// The pet's evolutionary stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Form {
    #[default]
    Egg,
    Ghost,
    Angel,
    Demon,
    Zombie,
    Wraith,
}

impl Form {
    pub const ALL: [Form; 6] = [
        Form::Egg,
        Form::Ghost,
        Form::Angel,
        Form::Demon,
        Form::Zombie,
        Form::Wraith,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Form::Egg => "egg",
            Form::Ghost => "ghost",
            Form::Angel => "angel",
            Form::Demon => "demon",
            Form::Zombie => "zombie",
            Form::Wraith => "wraith",
        }
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Form {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Form::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant::new("form", s))
    }
}

/// One entry of the form priority chain
pub struct FormRule {
    pub name: &'static str,
    pub form: Form,
    pub applies: fn(&PetStatistics) -> bool,
}

/// Form rules in priority order, first match wins.
pub const FORM_RULES: &[FormRule] = &[
    FormRule {
        name: "unhatched",
        form: Form::Egg,
        applies: |s| s.total_commits <= EGG_MAX_COMMITS,
    },
    FormRule {
        name: "chronic reverts",
        form: Form::Zombie,
        applies: |s| s.reverts > ZOMBIE_ABOVE_REVERTS,
    },
    FormRule {
        name: "ascended",
        form: Form::Wraith,
        applies: |s| {
            s.total_commits > WRAITH_ABOVE_COMMITS && s.quality_score() > VIRTUOUS_ABOVE_QUALITY
        },
    },
    FormRule {
        name: "mature and clean",
        form: Form::Angel,
        applies: |s| {
            s.total_commits > MATURE_ABOVE_COMMITS && s.quality_score() > VIRTUOUS_ABOVE_QUALITY
        },
    },
    FormRule {
        name: "mature and messy",
        form: Form::Demon,
        applies: |s| s.total_commits > MATURE_ABOVE_COMMITS,
    },
    FormRule {
        name: "drifting",
        form: Form::Ghost,
        applies: |_| true,
    },
];

/// Compute the form from cumulative history. Time plays no part.
pub fn evaluate_form(stats: &PetStatistics) -> Form {
    let rule = FORM_RULES.iter().find(|rule| (rule.applies)(stats));
    match rule {
        Some(rule) => {
            debug!(rule = rule.name, form = %rule.form, "Evaluated form");
            rule.form
        }
        None => Form::Ghost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn pet(commits: u64, reverts: u64, quality: f64) -> PetStatistics {
        let mut pet = PetStatistics::new(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap());
        pet.total_commits = commits;
        pet.reverts = reverts;
        pet.set_quality_score(quality);
        pet
    }

    #[test]
    fn test_egg_boundary() {
        assert_eq!(evaluate_form(&pet(0, 0, 50.0)), Form::Egg);
        assert_eq!(evaluate_form(&pet(10, 0, 50.0)), Form::Egg);
        assert_eq!(evaluate_form(&pet(11, 0, 50.0)), Form::Ghost);
    }

    #[test]
    fn test_egg_overrides_reverts_and_quality() {
        assert_eq!(evaluate_form(&pet(10, 50, 99.0)), Form::Egg);
    }

    #[test]
    fn test_fifty_commits_is_still_ghost() {
        assert_eq!(evaluate_form(&pet(50, 0, 70.0)), Form::Ghost);
        assert_eq!(evaluate_form(&pet(50, 0, 95.0)), Form::Ghost);
    }

    #[test]
    fn test_angel_and_demon() {
        assert_eq!(evaluate_form(&pet(51, 0, 70.1)), Form::Angel);
        assert_eq!(evaluate_form(&pet(51, 0, 70.0)), Form::Demon);
        assert_eq!(evaluate_form(&pet(100, 0, 90.0)), Form::Angel);
    }

    #[test]
    fn test_wraith_needs_volume_and_quality() {
        assert_eq!(evaluate_form(&pet(101, 0, 71.0)), Form::Wraith);
        assert_eq!(evaluate_form(&pet(101, 0, 70.0)), Form::Demon);
    }

    #[test]
    fn test_reverts_beat_wraith() {
        assert_eq!(evaluate_form(&pet(200, 21, 90.0)), Form::Zombie);
        assert_eq!(evaluate_form(&pet(200, 20, 90.0)), Form::Wraith);
    }

    #[test]
    fn test_zombie_in_ghost_range() {
        assert_eq!(evaluate_form(&pet(30, 25, 50.0)), Form::Zombie);
    }

    #[test]
    fn test_every_rule_is_reachable() {
        let samples = [
            pet(0, 0, 50.0),
            pet(30, 0, 50.0),
            pet(60, 0, 80.0),
            pet(60, 0, 40.0),
            pet(30, 30, 50.0),
            pet(150, 0, 80.0),
        ];
        for form in Form::ALL {
            assert!(
                samples.iter().any(|s| evaluate_form(s) == form),
                "no sample reached {form}"
            );
        }
    }

    #[test]
    fn test_form_display_and_parse() {
        assert_eq!(Form::Wraith.to_string(), "wraith");
        assert_eq!("ANGEL".parse::<Form>().unwrap(), Form::Angel);
        assert!("dragon".parse::<Form>().is_err());
    }
}
