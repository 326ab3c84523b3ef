//! Note table and pitch mapping.
//!
//! Frequencies are equal tempered relative to A4, which sounds at the
//! selected reference pitch.

use serde::{Deserialize, Serialize};

use crate::error::ToneError;

/// Octave that holds the reference note.
pub const REFERENCE_OCTAVE: i32 = 4;

/// Suffix marking the upper register in Byzantine labels.
const PRIME: &str = "᾽";

/// One chromatic note within an octave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteDef {
    /// Western name, e.g. "C#".
    pub name: &'static str,
    /// Byzantine (Greek) solfège name.
    pub greek: &'static str,
    /// Semitones from A within the same octave, -9..=+2.
    pub offset: i32,
    /// Raised (black) key.
    pub raised: bool,
}

/// The 12 notes of one octave, starting at C.
pub const NOTES: [NoteDef; 12] = [
    NoteDef { name: "C", greek: "Νη", offset: -9, raised: false },
    NoteDef { name: "C#", greek: "Νη+", offset: -8, raised: true },
    NoteDef { name: "D", greek: "Πα", offset: -7, raised: false },
    NoteDef { name: "D#", greek: "Βου-", offset: -6, raised: true },
    NoteDef { name: "E", greek: "Βου", offset: -5, raised: false },
    NoteDef { name: "F", greek: "Γα", offset: -4, raised: false },
    NoteDef { name: "F#", greek: "Γα+", offset: -3, raised: true },
    NoteDef { name: "G", greek: "Δι", offset: -2, raised: false },
    NoteDef { name: "G#", greek: "Κε-", offset: -1, raised: true },
    NoteDef { name: "A", greek: "Κε", offset: 0, raised: false },
    NoteDef { name: "A#", greek: "Ζω-", offset: 1, raised: true },
    NoteDef { name: "B", greek: "Ζω", offset: 2, raised: false },
];

/// How key labels are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    #[default]
    Byzantine,
    Western,
}

/// Index of `name` in [`NOTES`].
pub fn note_index(name: &str) -> Result<usize, ToneError> {
    NOTES
        .iter()
        .position(|n| n.name == name)
        .ok_or_else(|| ToneError::UnknownNote(name.to_string()))
}

/// Split a key id such as "C#4" into its note index and octave.
pub fn parse_key_id(id: &str) -> Result<(usize, i32), ToneError> {
    let bytes = id.as_bytes();
    if bytes.is_empty() || !bytes[0].is_ascii_uppercase() {
        return Err(ToneError::InvalidKeyId(id.to_string()));
    }
    let split = if bytes.get(1) == Some(&b'#') { 2 } else { 1 };
    let index = note_index(&id[..split])?;
    let octave = id[split..]
        .parse::<i32>()
        .map_err(|_| ToneError::InvalidKeyId(id.to_string()))?;
    Ok((index, octave))
}

/// Key id for a note index and octave, e.g. (1, 4) → "C#4".
pub fn key_id(index: usize, octave: i32) -> String {
    format!("{}{octave}", NOTES[index % 12].name)
}

/// Semitones between the note and the reference note A4.
pub fn semitones_from_reference(index: usize, octave: i32) -> i32 {
    (octave - REFERENCE_OCTAVE) * 12 + NOTES[index % 12].offset
}

/// `reference * 2^(n/12)`.
pub fn frequency_for_offset(reference: f64, semitones: i32) -> f64 {
    reference * 2.0_f64.powf(semitones as f64 / 12.0)
}

/// Frequency of a note index + octave under the given reference pitch.
pub fn frequency(reference: f64, index: usize, octave: i32) -> f64 {
    frequency_for_offset(reference, semitones_from_reference(index, octave))
}

/// Frequency of a named note, e.g. `note_frequency("A", 4, 440.0) == 440.0`.
pub fn note_frequency(name: &str, octave: i32, reference: f64) -> Result<f64, ToneError> {
    let index = note_index(name)?;
    Ok(frequency(reference, index, octave))
}

/// Display label for a key.
pub fn label(index: usize, octave: i32, style: LabelStyle) -> String {
    let note = &NOTES[index % 12];
    match style {
        LabelStyle::Western => format!("{}{octave}", note.name),
        LabelStyle::Byzantine => {
            // Ζω and Ζω- already belong to the upper tetrachord in octave 4.
            let primed = octave >= 5 || (octave == 4 && matches!(note.name, "A#" | "B"));
            if primed {
                format!("{}{PRIME}", note.greek)
            } else {
                note.greek.to_string()
            }
        }
    }
}

/// Truncate a frequency to 2 decimals for presentation.
///
/// Cuts the decimal string rather than scaling by 100, which would turn
/// 0.29 into 0.28.
pub fn display_hz(frequency: f64) -> String {
    let mut text = format!("{frequency:.6}");
    if let Some(dot) = text.find('.') {
        text.truncate(dot + 3);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_is_the_reference() {
        let f = note_frequency("A", 4, 440.0).unwrap();
        assert_eq!(display_hz(f), "440.00");
        let f = note_frequency("A", 4, 432.0).unwrap();
        assert!((f - 432.0).abs() < 1e-12);
    }

    #[test]
    fn formula_holds_for_every_note() {
        for octave in 0..8 {
            for (i, n) in NOTES.iter().enumerate() {
                let offset = (octave - 4) * 12 + n.offset;
                let expected = 440.0 * 2.0_f64.powf(offset as f64 / 12.0);
                let f = frequency(440.0, i, octave);
                assert!(
                    (f - expected).abs() < 1e-9,
                    "{}{octave}: expected {expected}, got {f}",
                    n.name
                );
            }
        }
    }

    #[test]
    fn offsets_span_one_octave() {
        let offsets: Vec<i32> = NOTES.iter().map(|n| n.offset).collect();
        assert_eq!(offsets, (-9..=2).collect::<Vec<_>>());
        assert_eq!(NOTES.iter().filter(|n| n.raised).count(), 5);
    }

    #[test]
    fn c4_and_octaves() {
        let c4 = note_frequency("C", 4, 440.0).unwrap();
        assert!((c4 - 261.6256).abs() < 1e-3, "C4 should be ~261.63Hz, got {c4}");
        let a3 = note_frequency("A", 3, 440.0).unwrap();
        let a5 = note_frequency("A", 5, 440.0).unwrap();
        assert!((a3 - 220.0).abs() < 1e-9);
        assert!((a5 - 880.0).abs() < 1e-9);
    }

    #[test]
    fn display_truncates() {
        // 261.6255... rounds to .63 but is shown as .62
        let c4 = note_frequency("C", 4, 440.0).unwrap();
        assert_eq!(display_hz(c4), "261.62");
        assert_eq!(display_hz(440.0), "440.00");
    }

    #[test]
    fn display_keeps_inexact_decimals() {
        assert_eq!(display_hz(0.29), "0.29");
        assert_eq!(display_hz(1.13), "1.13");
        assert_eq!(display_hz(4.35), "4.35");
        assert_eq!(display_hz(415.304_697_579_638_4), "415.30");
    }

    #[test]
    fn unknown_note_is_an_error() {
        assert_eq!(
            note_frequency("H", 4, 440.0),
            Err(ToneError::UnknownNote("H".to_string()))
        );
        assert!(note_index("Bb").is_err());
    }

    #[test]
    fn key_ids_parse() {
        assert_eq!(parse_key_id("C#4"), Ok((1, 4)));
        assert_eq!(parse_key_id("A3"), Ok((9, 3)));
        assert_eq!(parse_key_id("B-1"), Ok((11, -1)));
        assert!(matches!(parse_key_id("c4"), Err(ToneError::InvalidKeyId(_))));
        assert!(matches!(parse_key_id("C"), Err(ToneError::InvalidKeyId(_))));
        assert!(matches!(parse_key_id(""), Err(ToneError::InvalidKeyId(_))));
        assert!(matches!(parse_key_id("H4"), Err(ToneError::UnknownNote(_))));
        assert_eq!(key_id(1, 4), "C#4");
    }

    #[test]
    fn byzantine_primes() {
        assert_eq!(label(9, 3, LabelStyle::Byzantine), "Κε");
        assert_eq!(label(9, 4, LabelStyle::Byzantine), "Κε");
        assert_eq!(label(11, 4, LabelStyle::Byzantine), "Ζω᾽");
        assert_eq!(label(10, 4, LabelStyle::Byzantine), "Ζω-᾽");
        assert_eq!(label(0, 5, LabelStyle::Byzantine), "Νη᾽");
        assert_eq!(label(11, 3, LabelStyle::Byzantine), "Ζω");
        assert_eq!(label(1, 4, LabelStyle::Western), "C#4");
    }
}
