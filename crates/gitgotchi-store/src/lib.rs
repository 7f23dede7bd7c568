//! Persistence for gitgotchi.
//!
//! Each monitored repository owns exactly one pet record. [`PetStore`] is the
//! narrow load/save seam the CLI talks to; [`JsonFileStore`] keeps the record
//! as pretty JSON inside the repository's git directory.

mod json;

pub use json::{JsonFileStore, PET_FILE_NAME, STATE_DIR_NAME};

use chrono::{DateTime, Utc};
use gitgotchi_core::PetStatistics;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access pet state at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Pet state at {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode pet state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Load/save access to a repository's pet.
pub trait PetStore {
    /// Load the stored pet, or `None` if this repository has never had one.
    fn load(&self) -> Result<Option<PetStatistics>, StoreError>;

    /// Persist the pet, replacing whatever was stored before.
    fn save(&self, stats: &PetStatistics) -> Result<(), StoreError>;

    /// Load the stored pet, hatching a fresh one at `now` on first use.
    ///
    /// The flag is `true` when the pet was just hatched.
    fn load_or_hatch(&self, now: DateTime<Utc>) -> Result<(PetStatistics, bool), StoreError> {
        match self.load()? {
            Some(stats) => Ok((stats, false)),
            None => Ok((PetStatistics::new(now), true)),
        }
    }
}
