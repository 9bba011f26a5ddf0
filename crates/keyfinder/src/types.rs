use serde::{Deserialize, Serialize};

const NOTE_NAMES_SHARP: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const NOTE_NAMES_FLAT: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Pitch classes conventionally spelled with flats.
pub static FLAT_ROOTS: [u8; 6] = [1, 3, 5, 6, 8, 10]; // Db, Eb, F, Gb, Ab, Bb

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    Major,
    Minor,
}

impl KeyMode {
    /// Offset of this mode's block in the 24-entry scoreboard.
    pub(crate) fn offset(self) -> usize {
        match self {
            KeyMode::Major => 0,
            KeyMode::Minor => 12,
        }
    }
}

impl std::fmt::Display for KeyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyMode::Major => write!(f, "major"),
            KeyMode::Minor => write!(f, "minor"),
        }
    }
}

/// How tonic names are spelled in output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spelling {
    /// Always sharps: C, C#, D, D#, ...
    #[default]
    Sharps,
    /// Flats for the roots in [`FLAT_ROOTS`]: Db, Eb, Gb, Ab, Bb.
    Flats,
}

/// Name of a pitch class (0 = C) using sharps.
pub fn pitch_name(pitch_class: u8) -> &'static str {
    NOTE_NAMES_SHARP[(pitch_class % 12) as usize]
}

/// Name of a pitch class with the requested spelling.
pub fn spelled_name(pitch_class: u8, spelling: Spelling) -> &'static str {
    let pc = pitch_class % 12;
    match spelling {
        Spelling::Flats if FLAT_ROOTS.contains(&pc) => NOTE_NAMES_FLAT[pc as usize],
        _ => NOTE_NAMES_SHARP[pc as usize],
    }
}

/// One (tonic, mode) candidate and its correlation score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyEstimate {
    /// Pitch class of the tonic, 0–11 (C=0, C#=1, ...)
    pub tonic: u8,
    pub mode: KeyMode,
    /// Pearson correlation with the rotated mode profile
    pub score: f64,
}

impl KeyEstimate {
    /// Position in the scoreboard: majors 0–11, minors 12–23.
    pub fn index(&self) -> usize {
        self.mode.offset() + self.tonic as usize
    }

    /// Tonic name with sharps, e.g. "F#".
    pub fn tonic_name(&self) -> &'static str {
        pitch_name(self.tonic)
    }

    /// Compact key symbol: "C", "F#m", or with flats "Ebm".
    pub fn symbol(&self, spelling: Spelling) -> String {
        let mode_suffix = match self.mode {
            KeyMode::Minor => "m",
            KeyMode::Major => "",
        };
        format!("{}{}", spelled_name(self.tonic, spelling), mode_suffix)
    }
}

impl std::fmt::Display for KeyEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.tonic_name(), self.mode)
    }
}

/// Serializable summary of one analysis for downstream reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyReport {
    pub best: KeyEstimate,
    pub alternate: KeyEstimate,
    /// All 24 candidates in enumeration order (major C..B, then minor C..B)
    pub table: Vec<KeyEstimate>,
}
