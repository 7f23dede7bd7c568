use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use gitgotchi_core::{Form, Mood};
use serde::{Deserialize, Serialize};

pub const HISTORY_FILE_NAME: &str = "history.jsonl";

/// Represents each line type in the history JSONL file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryLine {
    Hatched {
        timestamp: DateTime<Utc>,
    },
    Fed {
        timestamp: DateTime<Utc>,
        commit: String,
        summary: String,
        lines_added: u64,
        lines_deleted: u64,
        conflict: bool,
        revert: bool,
        quality_score: f64,
        mood: Mood,
        form: Form,
    },
    Evolved {
        timestamp: DateTime<Utc>,
        from: Form,
        to: Form,
    },
}

impl HistoryLine {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Hatched { timestamp } => *timestamp,
            Self::Fed { timestamp, .. } => *timestamp,
            Self::Evolved { timestamp, .. } => *timestamp,
        }
    }
}

/// Appends history lines to a JSONL file.
pub struct HistoryWriter {
    file: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl HistoryWriter {
    /// Open `path` for appending, creating parent directories.
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            file: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Returns the path to the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, line: &HistoryLine) -> io::Result<()> {
        let json = serde_json::to_string(line)?;
        let mut writer = self
            .file
            .lock()
            .map_err(|_| io::Error::other("history writer lock poisoned"))?;
        writeln!(writer, "{}", json)?;
        writer.flush()
    }
}

/// Read every well-formed line of a history file.
///
/// A missing file is an empty history. Malformed lines are skipped.
pub fn read_history(path: &Path) -> io::Result<Vec<HistoryLine>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut lines = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<HistoryLine>(&line) {
            Ok(entry) => lines.push(entry),
            Err(e) => {
                tracing::warn!(line = number + 1, "Skipping malformed history line: {}", e);
            }
        }
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn ts(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 20, 10, minute, 0).unwrap()
    }

    #[test]
    fn test_append_and_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gitgotchi").join(HISTORY_FILE_NAME);

        let writer = HistoryWriter::open(&path).unwrap();
        writer.append(&HistoryLine::Hatched { timestamp: ts(0) }).unwrap();
        writer
            .append(&HistoryLine::Fed {
                timestamp: ts(1),
                commit: "abc1234".into(),
                summary: "fix: guard against empty input".into(),
                lines_added: 12,
                lines_deleted: 3,
                conflict: false,
                revert: false,
                quality_score: 80.0,
                mood: Mood::Ecstatic,
                form: Form::Egg,
            })
            .unwrap();
        drop(writer);

        let lines = read_history(&path).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], HistoryLine::Hatched { timestamp: ts(0) });
        assert!(matches!(
            lines[1],
            HistoryLine::Fed { mood: Mood::Ecstatic, lines_added: 12, .. }
        ));
        assert_eq!(lines[1].timestamp(), ts(1));
    }

    #[test]
    fn test_reopen_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(HISTORY_FILE_NAME);

        HistoryWriter::open(&path)
            .unwrap()
            .append(&HistoryLine::Hatched { timestamp: ts(0) })
            .unwrap();
        HistoryWriter::open(&path)
            .unwrap()
            .append(&HistoryLine::Evolved {
                timestamp: ts(5),
                from: Form::Egg,
                to: Form::Ghost,
            })
            .unwrap();

        let lines = read_history(&path).unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let lines = read_history(&dir.path().join("nope.jsonl")).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(HISTORY_FILE_NAME);
        fs::write(
            &path,
            concat!(
                r#"{"type":"hatched","timestamp":"2026-01-20T10:00:00Z"}"#,
                "\n",
                "garbage\n",
                "\n",
                r#"{"type":"evolved","timestamp":"2026-01-20T10:05:00Z","from":"egg","to":"ghost"}"#,
                "\n",
            ),
        )
        .unwrap();

        let lines = read_history(&path).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            HistoryLine::Evolved {
                timestamp: ts(5),
                from: Form::Egg,
                to: Form::Ghost,
            }
        );
    }
}
