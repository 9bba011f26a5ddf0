//! Krumhansl-Schmuckler key estimation over a pitch-class distribution.
//!
//! The distribution is correlated against the major and minor profiles
//! rotated onto every tonic. The 24 Pearson coefficients form a
//! [`Scoreboard`] that can be ranked or read back in enumeration order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KeyError, Result};
use crate::pcp::PitchClassVector;
use crate::profiles::{bank, RotatedTemplateBank};
use crate::types::{KeyEstimate, KeyMode, KeyReport};
use crate::{KEY_COUNT, PITCH_CLASSES};

/// Centered norms of the peak-normalized input at or below this count as silence.
const FLATNESS_TOLERANCE: f64 = 1e-12;

/// Correlates pitch-class distributions against the shared profile banks.
///
/// Holds only references to the process-wide banks, so it is free to copy
/// and share across threads.
#[derive(Debug, Clone, Copy)]
pub struct KeyEstimator {
    major: &'static RotatedTemplateBank,
    minor: &'static RotatedTemplateBank,
}

impl Default for KeyEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyEstimator {
    pub fn new() -> Self {
        Self {
            major: bank(KeyMode::Major),
            minor: bank(KeyMode::Minor),
        }
    }

    /// Validate raw energies and score them.
    pub fn estimate(&self, pitch_class_energy: &[f64]) -> Result<Scoreboard> {
        let pcv = PitchClassVector::new(pitch_class_energy)?;
        self.score(&pcv)
    }

    /// Score a validated distribution against all 24 keys.
    ///
    /// Fails with [`KeyError::InsufficientSignal`] when the centered input has
    /// zero norm, before any division happens. Scores depend only on the
    /// shape of the distribution, not its scale.
    pub fn score(&self, pcv: &PitchClassVector) -> Result<Scoreboard> {
        let (centered, norm) = pcv.centered().ok_or(KeyError::InsufficientSignal)?;
        // A flat vector leaves only rounding residue after centering.
        if norm <= FLATNESS_TOLERANCE {
            return Err(KeyError::InsufficientSignal);
        }

        let mut scores = [0.0_f64; KEY_COUNT];
        for (mode, templates) in [(KeyMode::Major, self.major), (KeyMode::Minor, self.minor)] {
            let denom = norm * templates.norm();
            for tonic in 0..PITCH_CLASSES {
                scores[mode.offset() + tonic] = templates.dot(tonic, &centered) / denom;
            }
        }

        let board = Scoreboard::from_scores(scores)?;
        let (best, alternate) = board.best_and_alternate();
        debug!(
            best = %best,
            best_score = best.score,
            alternate = %alternate,
            alternate_score = alternate.score,
            "scored pitch-class distribution"
        );
        Ok(board)
    }
}

/// Correlation of one distribution with all 24 keys.
///
/// Indices 0–11 are C..B major, 12–23 are C..B minor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<KeyEstimate>", try_from = "Vec<KeyEstimate>")]
pub struct Scoreboard {
    scores: [f64; KEY_COUNT],
}

impl Scoreboard {
    /// Build from precomputed scores in enumeration order.
    ///
    /// Rejects non-finite scores so rankings are always total.
    pub fn from_scores(scores: [f64; KEY_COUNT]) -> Result<Self> {
        for (index, &value) in scores.iter().enumerate() {
            if !value.is_finite() {
                return Err(KeyError::NonFiniteInput { index, value });
            }
        }
        Ok(Self { scores })
    }

    /// Correlation for one key.
    pub fn score(&self, tonic: u8, mode: KeyMode) -> f64 {
        self.scores[mode.offset() + (tonic as usize % PITCH_CLASSES)]
    }

    pub fn scores(&self) -> &[f64; KEY_COUNT] {
        &self.scores
    }

    fn entry(&self, index: usize) -> KeyEstimate {
        let (mode, tonic) = if index < PITCH_CLASSES {
            (KeyMode::Major, index)
        } else {
            (KeyMode::Minor, index - PITCH_CLASSES)
        };
        KeyEstimate {
            tonic: tonic as u8,
            mode,
            score: self.scores[index],
        }
    }

    /// Descending score, then ascending index.
    fn rank_order(&self, a: usize, b: usize) -> Ordering {
        self.scores[b]
            .partial_cmp(&self.scores[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    }

    /// All 24 candidates in enumeration order: major C..B, then minor C..B.
    pub fn full_table(&self) -> Vec<KeyEstimate> {
        (0..KEY_COUNT).map(|i| self.entry(i)).collect()
    }

    /// All 24 candidates, best first. Equal scores keep enumeration order.
    pub fn ranked(&self) -> Vec<KeyEstimate> {
        let mut order: Vec<usize> = (0..KEY_COUNT).collect();
        order.sort_by(|&a, &b| self.rank_order(a, b));
        order.into_iter().map(|i| self.entry(i)).collect()
    }

    /// Most likely key and runner-up.
    ///
    /// On equal scores the lower index wins: major before minor at the same
    /// tonic, lower tonic before higher.
    pub fn best_and_alternate(&self) -> (KeyEstimate, KeyEstimate) {
        let mut best = 0;
        let mut alternate = 1;
        if self.rank_order(alternate, best) == Ordering::Less {
            std::mem::swap(&mut best, &mut alternate);
        }
        for i in 2..KEY_COUNT {
            if self.rank_order(i, best) == Ordering::Less {
                alternate = best;
                best = i;
            } else if self.rank_order(i, alternate) == Ordering::Less {
                alternate = i;
            }
        }
        (self.entry(best), self.entry(alternate))
    }

    /// Best, alternate and full table bundled for reporting.
    pub fn report(&self) -> KeyReport {
        let (best, alternate) = self.best_and_alternate();
        KeyReport {
            best,
            alternate,
            table: self.full_table(),
        }
    }
}

impl From<Scoreboard> for Vec<KeyEstimate> {
    fn from(board: Scoreboard) -> Self {
        board.full_table()
    }
}

impl TryFrom<Vec<KeyEstimate>> for Scoreboard {
    type Error = KeyError;

    fn try_from(table: Vec<KeyEstimate>) -> Result<Self> {
        if table.len() != KEY_COUNT {
            return Err(KeyError::InvalidInputShape {
                expected: KEY_COUNT,
                actual: table.len(),
            });
        }
        let mut scores = [f64::NAN; KEY_COUNT];
        for est in &table {
            if est.tonic as usize >= PITCH_CLASSES {
                return Err(KeyError::InvalidInputShape {
                    expected: PITCH_CLASSES,
                    actual: est.tonic as usize + 1,
                });
            }
            scores[est.index()] = est.score;
        }
        // Any key missing from the table is still NaN and rejected here.
        Self::from_scores(scores)
    }
}
