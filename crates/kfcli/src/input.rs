//! Reading pitch-class distributions from arguments, files and stdin.
//!
//! Accepted documents:
//! - JSON: `[12 numbers]`, `[[12 numbers], ...]` (chromagram frames),
//!   `{"pitch_class_energy": [...]}` or `{"chroma": [[...], ...]}`
//! - Text: one line of 12 numbers, or one frame per line, separated by
//!   commas and/or whitespace. Lines starting with `#` are ignored.

use std::io::{BufRead, IsTerminal, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use keyfinder::PitchClassVector;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputDoc {
    Energy(Vec<f64>),
    Frames(Vec<Vec<f64>>),
    Object(InputObject),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InputObject {
    #[serde(default)]
    pitch_class_energy: Option<Vec<f64>>,
    #[serde(default)]
    chroma: Option<Vec<Vec<f64>>>,
}

/// Parse a document into a pitch-class vector.
pub fn parse_document(text: &str) -> Result<PitchClassVector> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        parse_json(trimmed)
    } else {
        parse_text(text)
    }
}

fn parse_json(text: &str) -> Result<PitchClassVector> {
    let doc: InputDoc = serde_json::from_str(text).context("invalid JSON input")?;
    let pcv = match doc {
        InputDoc::Energy(energy) => PitchClassVector::new(&energy)?,
        InputDoc::Frames(frames) => PitchClassVector::from_frames(&frames)?,
        InputDoc::Object(InputObject {
            pitch_class_energy: Some(energy),
            chroma: None,
        }) => PitchClassVector::new(&energy)?,
        InputDoc::Object(InputObject {
            pitch_class_energy: None,
            chroma: Some(frames),
        }) => PitchClassVector::from_frames(&frames)?,
        InputDoc::Object(_) => {
            bail!("JSON object needs exactly one of \"pitch_class_energy\" or \"chroma\"")
        }
    };
    Ok(pcv)
}

fn parse_text(text: &str) -> Result<PitchClassVector> {
    let mut frames = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let frame = parse_numbers(line).with_context(|| format!("line {}", lineno + 1))?;
        frames.push(frame);
    }

    match frames.len() {
        0 => bail!("no pitch-class values found"),
        1 => Ok(PitchClassVector::new(&frames[0])?),
        _ => Ok(PitchClassVector::from_frames(&frames)?),
    }
}

/// Split on commas and whitespace and parse every token as a number.
pub fn parse_numbers(text: &str) -> Result<Vec<f64>> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .map(|tok| {
            tok.parse::<f64>()
                .with_context(|| format!("not a number: {:?}", tok))
        })
        .collect()
}

/// Pitch-class vector from positional command-line values.
pub fn from_args(values: &[String]) -> Result<PitchClassVector> {
    let mut energy = Vec::with_capacity(12);
    for value in values {
        energy.extend(parse_numbers(value)?);
    }
    Ok(PitchClassVector::new(&energy)?)
}

/// Read and parse a file, or stdin when `path` is `-`.
pub fn from_path(path: &Path) -> Result<PitchClassVector> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    parse_document(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Read a single line from stdin, prompting when attached to a terminal.
pub fn from_prompt() -> Result<PitchClassVector> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprint!("Enter 12 pitch-class energies (C to B) or a path to a chroma file: ");
        std::io::stderr().flush().ok();
        let mut line = String::new();
        stdin.lock().read_line(&mut line).context("reading stdin")?;
        let line = line.trim();
        let candidate = Path::new(line);
        if candidate.is_file() {
            return from_path(candidate);
        }
        return parse_document(line);
    }

    let mut buf = String::new();
    stdin.lock().read_to_string(&mut buf).context("reading stdin")?;
    parse_document(&buf).context("parsing stdin")
}
