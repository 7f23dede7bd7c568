//! # gitgotchi-core
//!
//! The pet state model: raw statistics, the mood and form rule chains, and
//! feeding.
//!
//! Nothing in this crate performs I/O or reads the wall clock. Every
//! time-dependent function takes `now` explicitly; callers get it from a
//! [`Clock`].
//!
//! ## Per-commit sequence
//!
//! ```rust,ignore
//! let mut stats = store.load()?;
//! let outcome = record_commit(&mut stats, &delta, clock.now());
//! store.save(&stats)?;
//! ```
//!
//! [`record_commit`] applies the deltas, calls [`PetStatistics::feed`] and then
//! [`PetStatistics::update_form`]. Feeding alone never evolves the pet.

mod clock;
mod error;
mod feeding;
pub mod form;
pub mod mood;
mod stats;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::UnknownVariant;
pub use feeding::{record_commit, CommitOutcome};
pub use form::{evaluate_form, Form};
pub use mood::{evaluate_mood, Mood};
pub use stats::{CommitDelta, PetStatistics, DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY};
