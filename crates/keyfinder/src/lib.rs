//! Musical key estimation from pitch-class energy.
//!
//! Correlates a 12-bin pitch-class distribution (typically a chromagram
//! summed over a recording's harmonic content) against the Krumhansl-Kessler
//! major and minor profiles rotated onto every tonic, and ranks the 24
//! resulting keys by Pearson correlation.
//!
//! ```
//! use keyfinder::{KeyEstimator, KeyMode};
//!
//! // Strong C, E and G
//! let energy = [10.0, 1.0, 1.0, 1.0, 8.0, 1.0, 1.0, 9.0, 1.0, 1.0, 1.0, 1.0];
//! let board = KeyEstimator::new().estimate(&energy)?;
//! let (best, alternate) = board.best_and_alternate();
//!
//! assert_eq!((best.tonic, best.mode), (0, KeyMode::Major));
//! println!("Most likely: {}, also possible: {}", best, alternate);
//! # Ok::<(), keyfinder::KeyError>(())
//! ```
//!
//! Audio decoding and chromagram extraction are out of scope; callers hand
//! in the distribution, or the chromagram frames via
//! [`PitchClassVector::from_frames`].

pub mod error;
pub mod estimator;
pub mod pcp;
pub mod profiles;
pub mod types;

pub use error::{KeyError, Result};
pub use estimator::{KeyEstimator, Scoreboard};
pub use pcp::PitchClassVector;
pub use profiles::{RotatedTemplateBank, MAJOR_PROFILE, MINOR_PROFILE};
pub use types::{pitch_name, spelled_name, KeyEstimate, KeyMode, KeyReport, Spelling};

/// Semitone bins per octave.
pub const PITCH_CLASSES: usize = 12;

/// Candidate keys: 12 tonics in each of two modes.
pub const KEY_COUNT: usize = 2 * PITCH_CLASSES;

/// Score a distribution with the shared profile banks.
pub fn estimate_key(pcv: &PitchClassVector) -> Result<Scoreboard> {
    KeyEstimator::new().score(pcv)
}
