use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use gitgotchi_core::PetStatistics;
use tracing::debug;

use crate::{PetStore, StoreError};

/// Directory inside the git dir that holds all gitgotchi state
pub const STATE_DIR_NAME: &str = "gitgotchi";
pub const PET_FILE_NAME: &str = "pet.json";

/// Stores the pet as a JSON file.
///
/// Saves go through a sibling temp file and a rename, so a reader never sees
/// a half-written record.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at `<git_dir>/gitgotchi/pet.json`.
    pub fn for_git_dir(git_dir: &Path) -> Self {
        Self::at(Self::state_dir(git_dir).join(PET_FILE_NAME))
    }

    /// Store at an explicit path (useful for testing).
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// The gitgotchi state directory for a git dir.
    pub fn state_dir(git_dir: &Path) -> PathBuf {
        git_dir.join(STATE_DIR_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| PET_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl PetStore for JsonFileStore {
    fn load(&self) -> Result<Option<PetStatistics>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No stored pet");
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let mut stats: PetStatistics =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: self.path.display().to_string(),
                source,
            })?;

        // Hand-edited files may carry an out-of-range score
        let score = stats.quality_score();
        stats.set_quality_score(score);

        debug!(
            path = %self.path.display(),
            commits = stats.total_commits,
            "Loaded pet"
        );

        Ok(Some(stats))
    }

    fn save(&self, stats: &PetStatistics) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(stats)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let tmp = self.tmp_path();
        let write = || -> io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        };

        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp);
            return Err(self.io_error(e));
        }

        debug!(path = %self.path.display(), "Saved pet");
        Ok(())
    }
}
