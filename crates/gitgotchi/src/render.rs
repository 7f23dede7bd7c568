//! Terminal rendering for the pet.
//!
//! Every renderer returns a `String`; callers decide where it goes.

use colored::{Color, Colorize};

use gitgotchi_core::{Form, Mood, PetStatistics};

const PANEL_PADDING: usize = 2;

const OFFERINGS: &[&str] = &[
    "The spirits accept your offering...",
    "Your ghost feeds on fresh commits...",
    "The code flows through the ethereal plane...",
    "Another soul added to the repository...",
    "The haunting continues...",
];

pub fn sprite(form: Form) -> &'static str {
    match form {
        Form::Egg => {
            r#"
    .-""-.
   /      \
  |  o  o  |
   \  __  /
    '-..-'
"#
        }
        Form::Ghost => {
            r#"
    .-.
   (o.o)
    |=|
   __|__
  /     \
 | () () |
  \     /
   `---'
"#
        }
        Form::Angel => {
            r#"
    \|/
  .-'o'-.
 /  \_/  \
|  (o.o)  |
 \   |   /
  '--|--'
     |
    / \
"#
        }
        Form::Demon => {
            r#"
   /\ /\
  (  o.o )
   > ^ <
  /|   |\
 (_|   |_)
   |   |
  /|   |\
"#
        }
        Form::Zombie => {
            r#"
    .---.
   /x   x\
  |  ___  |
   \ \_/ /
    |||||
   /|   |\
  / |   | \
"#
        }
        Form::Wraith => {
            r#"
    ___
  .'   '.
 /  o o  \
|    ^    |
 \  \_/  /
  '.___.'
   |||||
  ~~~~~~~
"#
        }
    }
}

pub fn mood_color(mood: Mood) -> Color {
    match mood {
        Mood::Ecstatic => Color::BrightYellow,
        Mood::Happy => Color::Green,
        Mood::Neutral => Color::White,
        Mood::Hungry => Color::Yellow,
        Mood::Sick => Color::Magenta,
        Mood::Dying => Color::Red,
        Mood::Possessed => Color::BrightMagenta,
    }
}

pub fn mood_message(mood: Mood) -> &'static str {
    match mood {
        Mood::Ecstatic => "✨ Your spectral companion radiates ethereal joy! ✨",
        Mood::Happy => "😊 Your ghost purrs with contentment",
        Mood::Neutral => "👻 Your pet watches silently from the shadows",
        Mood::Hungry => "🍽️  Your ghost is fading... feed it with commits!",
        Mood::Sick => "🤢 Dark magic has weakened your pet...",
        Mood::Dying => "💀 The spirits grow restless... commit soon!",
        Mood::Possessed => "👿 CURSED CODE DETECTED! Your pet writhes in agony!",
    }
}

/// The pet in a mood-colored panel, optionally with its counters.
pub fn render_pet(stats: &PetStatistics, show_stats: bool) -> String {
    let mood = stats.current_mood();
    let color = mood_color(mood);

    let mut body: Vec<String> = sprite(stats.current_form())
        .lines()
        .skip_while(|l| l.is_empty())
        .map(String::from)
        .collect();

    let mut stat_lines = Vec::new();
    if show_stats {
        body.push(String::new());
        stat_lines = vec![
            (format!("Commits:       {}", stats.total_commits), Color::Cyan),
            (
                format!("Quality:       {:.1}/100", stats.quality_score()),
                Color::Cyan,
            ),
            (format!("Lines Added:   {}", stats.lines_added), Color::Green),
            (format!("Lines Deleted: {}", stats.lines_deleted), Color::Red),
            (
                format!("Lines Changed: {}", stats.total_lines_changed()),
                Color::White,
            ),
            (format!("Conflicts:     {}", stats.merge_conflicts), Color::Yellow),
            (format!("Reverts:       {}", stats.reverts), Color::Magenta),
        ];
    }

    let title = format!(
        "{} - {}",
        stats.current_form().as_str().to_uppercase(),
        mood
    );

    let width = body
        .iter()
        .map(|l| l.chars().count())
        .chain(stat_lines.iter().map(|(l, _)| l.chars().count()))
        .chain(std::iter::once(title.chars().count() + 2))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&top_border(&title, width, color));
    out.push('\n');
    out.push_str(&panel_line("", width, color, color));
    out.push('\n');
    for line in &body {
        out.push_str(&panel_line(line, width, color, color));
        out.push('\n');
    }
    for (line, line_color) in &stat_lines {
        out.push_str(&panel_line(line, width, color, *line_color));
        out.push('\n');
    }
    out.push_str(&panel_line("", width, color, color));
    out.push('\n');
    out.push_str(&bottom_border(width, color));
    out.push('\n');
    out.push_str(&format!("  {}", mood_message(mood).color(color)));
    out.push('\n');
    out
}

/// Banner shown when the form changes
pub fn render_evolution(from: Form, to: Form) -> String {
    let bolts = "⚡".repeat(20);
    format!(
        "\n{}\n{}\n{}\n{}\n",
        bolts.bright_yellow(),
        "Something stirs in the darkness...".bright_yellow().bold(),
        format!("Your {} is evolving into a {}!", from, to)
            .bright_cyan()
            .bold(),
        bolts.bright_yellow()
    )
}

/// Short reply printed by the post-commit hook
pub fn render_commit_response(stats: &PetStatistics, lines_added: u64, lines_deleted: u64) -> String {
    let offering = OFFERINGS[(stats.total_commits as usize) % OFFERINGS.len()];
    format!(
        "\n{}\n{} {} lines\n{}",
        offering.dimmed(),
        format!("+{}", lines_added).green(),
        format!("-{}", lines_deleted).red(),
        render_pet(stats, false)
    )
}

pub fn render_error(message: &str) -> String {
    let mut lines = vec!["The spirits are restless...".to_string(), String::new()];
    lines.extend(message.lines().map(String::from));

    let title = "ERROR";
    let width = lines
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(title.len() + 2))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&top_border(title, width, Color::Red));
    out.push('\n');
    for (i, line) in lines.iter().enumerate() {
        let styled = if i == 0 {
            panel_line(line, width, Color::Red, Color::BrightRed)
        } else {
            panel_line(line, width, Color::Red, Color::White)
        };
        out.push_str(&styled);
        out.push('\n');
    }
    out.push_str(&bottom_border(width, Color::Red));
    out.push('\n');
    out
}

fn top_border(title: &str, width: usize, color: Color) -> String {
    let inner = width + PANEL_PADDING * 2;
    let label = format!(" {} ", title);
    let rest = inner.saturating_sub(label.chars().count() + 1);
    format!(
        "{}{}{}{}",
        "╭─".color(color),
        label.color(color).bold(),
        "─".repeat(rest).color(color),
        "╮".color(color)
    )
}

fn bottom_border(width: usize, color: Color) -> String {
    let inner = width + PANEL_PADDING * 2;
    format!("{}", format!("╰{}╯", "─".repeat(inner)).color(color))
}

fn panel_line(text: &str, width: usize, border: Color, content: Color) -> String {
    let pad = " ".repeat(PANEL_PADDING);
    let fill = " ".repeat(width.saturating_sub(text.chars().count()));
    format!(
        "{}{}{}{}{}{}",
        "│".color(border),
        pad,
        text.color(content),
        fill,
        pad,
        "│".color(border)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use gitgotchi_core::{record_commit, CommitDelta};

    fn plain() {
        colored::control::set_override(false);
    }

    fn grown_pet() -> PetStatistics {
        let t0 = Utc.with_ymd_and_hms(2026, 4, 2, 8, 0, 0).unwrap();
        let mut pet = PetStatistics::new(t0);
        let delta = CommitDelta {
            lines_added: 10,
            lines_deleted: 2,
            quality_score: Some(61.25),
            ..Default::default()
        };
        for _ in 0..12 {
            record_commit(&mut pet, &delta, t0);
        }
        pet
    }

    #[test]
    fn test_render_pet_with_stats() {
        plain();
        let out = render_pet(&grown_pet(), true);
        assert!(out.contains("GHOST - happy"));
        assert!(out.contains("Commits:       12"));
        assert!(out.contains("Quality:       61.2/100") || out.contains("Quality:       61.3/100"));
        assert!(out.contains("Lines Added:   120"));
        assert!(out.contains("Lines Changed: 144"));
        assert!(out.contains("(o.o)"));
        assert!(out.contains(mood_message(Mood::Happy)));
    }

    #[test]
    fn test_render_pet_without_stats() {
        plain();
        let out = render_pet(&grown_pet(), false);
        assert!(!out.contains("Commits:"));
        assert!(out.contains("GHOST - happy"));
    }

    #[test]
    fn test_panel_lines_line_up() {
        plain();
        let out = render_pet(&grown_pet(), true);
        let widths: Vec<usize> = out
            .lines()
            .filter(|l| l.starts_with('│') || l.starts_with('╭') || l.starts_with('╰'))
            .map(|l| l.chars().count())
            .collect();
        assert!(widths.len() > 3);
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn test_every_form_has_a_sprite() {
        for form in Form::ALL {
            assert!(!sprite(form).trim().is_empty(), "{form} has no sprite");
        }
        for mood in Mood::ALL {
            assert!(!mood_message(mood).is_empty());
        }
    }

    #[test]
    fn test_render_evolution() {
        plain();
        let out = render_evolution(Form::Egg, Form::Ghost);
        assert!(out.contains("Your egg is evolving into a ghost!"));
    }

    #[test]
    fn test_commit_response_is_deterministic() {
        plain();
        let pet = grown_pet();
        let a = render_commit_response(&pet, 10, 2);
        assert_eq!(a, render_commit_response(&pet, 10, 2));
        assert!(a.contains("+10 -2 lines"));
        assert!(a.contains(OFFERINGS[12 % OFFERINGS.len()]));
    }

    #[test]
    fn test_render_error() {
        plain();
        let out = render_error("Failed to load pet state: disk on fire");
        assert!(out.contains("ERROR"));
        assert!(out.contains("The spirits are restless..."));
        assert!(out.contains("disk on fire"));
    }
}
