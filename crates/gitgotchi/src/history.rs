use anyhow::Result;
use colored::Colorize;

use gitgotchi_logging::HistoryLine;

use crate::pet::PetHome;

pub fn handle_history(home: &PetHome, limit: usize, json: bool) -> Result<()> {
    let history = home.history()?;
    let recent = most_recent(&history, limit);

    if json {
        println!("{}", serde_json::to_string_pretty(recent)?);
        return Ok(());
    }

    if recent.is_empty() {
        println!("{}", "No history yet. Make a commit to feed your pet.".dimmed());
        return Ok(());
    }

    for line in recent {
        println!("{}", format_line(line));
    }
    Ok(())
}

fn most_recent(history: &[HistoryLine], limit: usize) -> &[HistoryLine] {
    &history[history.len().saturating_sub(limit)..]
}

fn format_line(line: &HistoryLine) -> String {
    let when = line.timestamp().format("%Y-%m-%d %H:%M").to_string();
    match line {
        HistoryLine::Hatched { .. } => {
            format!("{}  {}", when.dimmed(), "🥚 hatched".bright_white())
        }
        HistoryLine::Fed {
            commit,
            summary,
            lines_added,
            lines_deleted,
            conflict,
            revert,
            quality_score,
            mood,
            ..
        } => {
            let mut flags = String::new();
            if *conflict {
                flags.push_str(" conflict");
            }
            if *revert {
                flags.push_str(" revert");
            }
            format!(
                "{}  {} {} {} {} q={:.0} {}{}",
                when.dimmed(),
                commit.bright_cyan(),
                format!("+{}", lines_added).green(),
                format!("-{}", lines_deleted).red(),
                summary,
                quality_score,
                mood.to_string().dimmed(),
                flags.yellow()
            )
        }
        HistoryLine::Evolved { from, to, .. } => format!(
            "{}  {}",
            when.dimmed(),
            format!("⚡ evolved {} -> {}", from, to).bright_yellow()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use gitgotchi_core::{Form, Mood};

    #[test]
    fn test_format_fed_line() {
        colored::control::set_override(false);
        let line = HistoryLine::Fed {
            timestamp: Utc.with_ymd_and_hms(2026, 5, 10, 18, 4, 0).unwrap(),
            commit: "abc1234".into(),
            summary: "fix: stop leaking handles".into(),
            lines_added: 9,
            lines_deleted: 4,
            conflict: true,
            revert: false,
            quality_score: 42.0,
            mood: Mood::Sick,
            form: Form::Ghost,
        };
        assert_eq!(
            format_line(&line),
            "2026-05-10 18:04  abc1234 +9 -4 fix: stop leaking handles q=42 sick conflict"
        );
    }

    #[test]
    fn test_most_recent_keeps_the_tail_as_a_json_array() {
        let at = |minute| Utc.with_ymd_and_hms(2026, 5, 10, 18, minute, 0).unwrap();
        let history = vec![
            HistoryLine::Hatched { timestamp: at(0) },
            HistoryLine::Evolved {
                timestamp: at(1),
                from: Form::Egg,
                to: Form::Ghost,
            },
            HistoryLine::Evolved {
                timestamp: at(2),
                from: Form::Ghost,
                to: Form::Demon,
            },
        ];

        assert_eq!(most_recent(&history, 20).len(), 3);
        assert!(most_recent(&history, 0).is_empty());

        let recent = most_recent(&history, 2);
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string_pretty(recent).unwrap()).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["type"], "evolved");
        assert_eq!(entries[1]["to"], "demon");
    }

    #[test]
    fn test_format_evolved_line() {
        colored::control::set_override(false);
        let line = HistoryLine::Evolved {
            timestamp: Utc.with_ymd_and_hms(2026, 5, 10, 18, 4, 0).unwrap(),
            from: Form::Ghost,
            to: Form::Demon,
        };
        assert!(format_line(&line).ends_with("⚡ evolved ghost -> demon"));
    }
}
