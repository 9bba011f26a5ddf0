use serde::{Deserialize, Serialize};

use crate::error::{KeyError, Result};
use crate::profiles::{l2_norm, mean_center};
use crate::PITCH_CLASSES;

/// Summed harmonic energy per pitch class (index 0 = C ... 11 = B).
///
/// Always exactly 12 finite bins. The estimator never mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct PitchClassVector([f64; 12]);

impl PitchClassVector {
    /// Validate a slice of pitch-class energies.
    pub fn new(energy: &[f64]) -> Result<Self> {
        let bins: [f64; 12] = energy
            .try_into()
            .map_err(|_| KeyError::shape(energy.len()))?;
        for (index, &value) in bins.iter().enumerate() {
            if !value.is_finite() {
                return Err(KeyError::NonFiniteInput { index, value });
            }
        }
        Ok(Self(bins))
    }

    /// Sum a chromagram, one 12-bin frame per analysis window, into a
    /// pitch-class distribution.
    pub fn from_frames<F: AsRef<[f64]>>(frames: &[F]) -> Result<Self> {
        if frames.is_empty() {
            return Err(KeyError::shape(0));
        }

        let mut sum = [0.0_f64; 12];
        for frame in frames {
            let frame = frame.as_ref();
            if frame.len() != PITCH_CLASSES {
                return Err(KeyError::shape(frame.len()));
            }
            for (acc, v) in sum.iter_mut().zip(frame) {
                *acc += v;
            }
        }

        Self::new(&sum)
    }

    pub fn as_array(&self) -> &[f64; 12] {
        &self.0
    }

    /// Energy at a pitch class (wraps modulo 12).
    pub fn energy(&self, pitch_class: usize) -> f64 {
        self.0[pitch_class % PITCH_CLASSES]
    }

    /// Total energy across all bins.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Largest absolute bin value.
    pub fn peak(&self) -> f64 {
        self.0.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
    }

    /// Peak-normalized, mean-centered copy plus its L2 norm.
    ///
    /// Bins are divided by the loudest one first so the mean and the squares
    /// stay finite and non-zero for any finite input. `None` when every bin is 0.
    pub(crate) fn centered(&self) -> Option<([f64; 12], f64)> {
        let peak = self.peak();
        if peak == 0.0 {
            return None;
        }
        let scaled = self.0.map(|v| v / peak);
        let centered = mean_center(&scaled);
        let norm = l2_norm(&centered);
        Some((centered, norm))
    }
}

impl TryFrom<Vec<f64>> for PitchClassVector {
    type Error = KeyError;

    fn try_from(value: Vec<f64>) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<PitchClassVector> for Vec<f64> {
    fn from(value: PitchClassVector) -> Self {
        value.0.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_wrong_length() {
        let err = PitchClassVector::new(&[1.0; 11]).unwrap_err();
        assert_eq!(
            err,
            KeyError::InvalidInputShape {
                expected: 12,
                actual: 11
            }
        );
        assert!(PitchClassVector::new(&[1.0; 13]).is_err());
        assert!(PitchClassVector::new(&[]).is_err());
    }

    #[test]
    fn rejects_nan() {
        let mut bins = [1.0; 12];
        bins[4] = f64::NAN;
        match PitchClassVector::new(&bins) {
            Err(KeyError::NonFiniteInput { index, .. }) => assert_eq!(index, 4),
            other => panic!("expected NonFiniteInput, got {:?}", other),
        }
    }

    #[test]
    fn frames_sum_per_pitch_class() {
        let frames = vec![
            vec![1.0, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.25, 0.0, 0.0, 0.0, 0.0],
            vec![2.0, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.75, 0.0, 0.0, 0.0, 1.0],
        ];
        let pcv = PitchClassVector::from_frames(&frames).unwrap();
        assert_eq!(pcv.energy(0), 3.0);
        assert_eq!(pcv.energy(4), 1.0);
        assert_eq!(pcv.energy(7), 1.0);
        assert_eq!(pcv.energy(11), 1.0);
        assert_eq!(pcv.total(), 6.0);
    }

    #[test]
    fn frames_reject_ragged_and_empty() {
        let ragged = vec![vec![0.0; 12], vec![0.0; 7]];
        assert_eq!(
            PitchClassVector::from_frames(&ragged).unwrap_err(),
            KeyError::InvalidInputShape {
                expected: 12,
                actual: 7
            }
        );
        let empty: Vec<Vec<f64>> = vec![];
        assert!(PitchClassVector::from_frames(&empty).is_err());
    }

    #[test]
    fn centered_has_zero_mean() {
        let pcv = PitchClassVector::new(&[10.0, 1.0, 1.0, 1.0, 8.0, 1.0, 1.0, 9.0, 1.0, 1.0, 1.0, 1.0])
            .unwrap();
        let (centered, norm) = pcv.centered().unwrap();
        assert!(centered.iter().sum::<f64>().abs() < 1e-12);
        assert!(norm > 0.0);
    }

    #[test]
    fn centered_is_scale_free() {
        let base = [1.0, 1.0, 9.0, 1.0, 1.0, 1.0, 1.0, 10.0, 1.0, 1.0, 1.0, 8.0];
        let (expected, expected_norm) = PitchClassVector::new(&base).unwrap().centered().unwrap();

        for scale in [1e300, 1e-300] {
            let scaled: Vec<f64> = base.iter().map(|v| v * scale).collect();
            let (centered, norm) = PitchClassVector::new(&scaled).unwrap().centered().unwrap();
            assert!((norm - expected_norm).abs() < 1e-9, "scale {} gave norm {}", scale, norm);
            for (a, b) in centered.iter().zip(&expected) {
                assert!((a - b).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn centered_of_silence_is_none() {
        assert!(PitchClassVector::new(&[0.0; 12]).unwrap().centered().is_none());
        assert!(PitchClassVector::new(&[-0.0; 12]).unwrap().centered().is_none());
    }

    #[test]
    fn deserializes_from_json_array() {
        let pcv: PitchClassVector =
            serde_json::from_str("[1,0,0,0,1,0,0,1,0,0,0,0]").unwrap();
        assert_eq!(pcv.energy(7), 1.0);
        assert!(serde_json::from_str::<PitchClassVector>("[1,2,3]").is_err());
    }
}
