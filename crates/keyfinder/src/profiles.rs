//! Krumhansl-Kessler tonal profiles and their 12 tonic rotations.
//!
//! Profiles are probe-tone ratings from Krumhansl & Kessler (1982), indexed
//! by scale degree from the tonic. Each bank stores the mean-centered
//! profile rotated onto every tonic, plus the profile's L2 norm.

use std::sync::LazyLock;

use crate::types::KeyMode;
use crate::PITCH_CLASSES;

/// Krumhansl-Kessler major key profile.
pub const MAJOR_PROFILE: [f64; 12] = [6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88];

/// Krumhansl-Kessler minor key profile.
pub const MINOR_PROFILE: [f64; 12] = [6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17];

static MAJOR_BANK: LazyLock<RotatedTemplateBank> =
    LazyLock::new(|| RotatedTemplateBank::from_profile(&MAJOR_PROFILE));

static MINOR_BANK: LazyLock<RotatedTemplateBank> =
    LazyLock::new(|| RotatedTemplateBank::from_profile(&MINOR_PROFILE));

/// Base (unrotated, uncentered) profile for a mode.
pub fn profile(mode: KeyMode) -> &'static [f64; 12] {
    match mode {
        KeyMode::Major => &MAJOR_PROFILE,
        KeyMode::Minor => &MINOR_PROFILE,
    }
}

/// Shared rotated bank for a mode, built on first use.
pub fn bank(mode: KeyMode) -> &'static RotatedTemplateBank {
    match mode {
        KeyMode::Major => &MAJOR_BANK,
        KeyMode::Minor => &MINOR_BANK,
    }
}

/// Rotate `values` so that index 0 moves to `tonic`.
///
/// `rotate(v, k)[p] == v[(p - k) mod 12]`.
pub fn rotate(values: &[f64; 12], tonic: usize) -> [f64; 12] {
    let mut rotated = [0.0; 12];
    for (p, slot) in rotated.iter_mut().enumerate() {
        *slot = values[(p + PITCH_CLASSES - tonic % PITCH_CLASSES) % PITCH_CLASSES];
    }
    rotated
}

pub(crate) fn mean_center(values: &[f64; 12]) -> [f64; 12] {
    let mean = values.iter().sum::<f64>() / PITCH_CLASSES as f64;
    let mut centered = *values;
    for v in &mut centered {
        *v -= mean;
    }
    centered
}

pub(crate) fn l2_norm(values: &[f64; 12]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// A mode profile, mean-centered and rotated onto all 12 tonics.
#[derive(Debug, Clone)]
pub struct RotatedTemplateBank {
    /// Row k is the centered profile anchored at tonic k.
    rotations: [[f64; 12]; 12],
    norm: f64,
}

impl RotatedTemplateBank {
    pub fn from_profile(profile: &[f64; 12]) -> Self {
        let centered = mean_center(profile);
        let mut rotations = [[0.0; 12]; 12];
        for (tonic, row) in rotations.iter_mut().enumerate() {
            *row = rotate(&centered, tonic);
        }
        Self {
            rotations,
            norm: l2_norm(&centered),
        }
    }

    /// Centered profile anchored at `tonic` (0–11).
    pub fn rotation(&self, tonic: usize) -> &[f64; 12] {
        &self.rotations[tonic % PITCH_CLASSES]
    }

    /// L2 norm of the centered profile; identical for every rotation.
    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// Dot product of rotation `tonic` with an already-centered vector.
    ///
    /// Accumulates in scale-degree order from the tonic, so inputs that repeat
    /// under transposition score bit-identically on equivalent tonics.
    pub fn dot(&self, tonic: usize, centered: &[f64; 12]) -> f64 {
        let row = self.rotation(tonic);
        let mut sum = 0.0;
        for degree in 0..PITCH_CLASSES {
            let p = (tonic + degree) % PITCH_CLASSES;
            sum += row[p] * centered[p];
        }
        sum
    }
}
