use crate::PITCH_CLASSES;

/// Errors from key estimation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KeyError {
    /// Input did not have one bin per pitch class.
    #[error("expected {expected} pitch-class bins, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },

    /// Input carries no tonal information (zero energy, or every bin equal),
    /// so every correlation would divide by zero.
    #[error("insufficient signal: pitch-class energy has zero variance")]
    InsufficientSignal,

    /// A bin was NaN or infinite.
    #[error("non-finite energy {value} at pitch class {index}")]
    NonFiniteInput { index: usize, value: f64 },
}

impl KeyError {
    pub(crate) fn shape(actual: usize) -> Self {
        KeyError::InvalidInputShape {
            expected: PITCH_CLASSES,
            actual,
        }
    }
}

pub type Result<T> = std::result::Result<T, KeyError>;
