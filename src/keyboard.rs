//! Key layout — the playable keys between two notes.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::ToneError;
use crate::notes::{self, LabelStyle};

/// One playable key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyInstance {
    /// Note name + octave, e.g. "F#4". Unique within a layout.
    pub id: String,
    pub frequency: f64,
    pub label: String,
    pub raised: bool,
}

impl KeyInstance {
    /// Frequency truncated to 2 decimals.
    pub fn display_frequency(&self) -> String {
        notes::display_hz(self.frequency)
    }
}

/// Inclusive bounds of the keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyRange {
    pub start_note: String,
    pub start_octave: i32,
    pub end_note: String,
    pub end_octave: i32,
}

impl Default for KeyRange {
    fn default() -> Self {
        KeyRange {
            start_note: "A".to_string(),
            start_octave: 3,
            end_note: "D".to_string(),
            end_octave: 5,
        }
    }
}

/// Octaves a range bound may name (MIDI C-1 up to the top of octave 10).
pub const OCTAVES: RangeInclusive<i32> = -1..=10;

/// Number of keys between two bounds, inclusive.
///
/// Fails when either bound names an unknown note, lies outside
/// [`OCTAVES`], or the end lies before the start.
pub fn key_count(
    start_note: &str,
    start_octave: i32,
    end_note: &str,
    end_octave: i32,
) -> Result<usize, ToneError> {
    let start_index = notes::note_index(start_note)? as i32;
    let end_index = notes::note_index(end_note)? as i32;
    for octave in [start_octave, end_octave] {
        if !OCTAVES.contains(&octave) {
            return Err(ToneError::OctaveOutOfRange(octave));
        }
    }

    let count = (end_octave - start_octave) * 12 + (end_index - start_index) + 1;
    if count < 1 {
        return Err(ToneError::EmptyRange {
            start: format!("{start_note}{start_octave}"),
            end: format!("{end_note}{end_octave}"),
        });
    }
    Ok(count as usize)
}

impl KeyRange {
    pub fn key_count(&self) -> Result<usize, ToneError> {
        key_count(
            &self.start_note,
            self.start_octave,
            &self.end_note,
            self.end_octave,
        )
    }
}

/// Produce every semitone from start to end inclusive.
///
/// Fails without producing anything when [`key_count`] rejects the bounds.
pub fn generate_keys(
    start_note: &str,
    start_octave: i32,
    end_note: &str,
    end_octave: i32,
    reference: f64,
    style: LabelStyle,
) -> Result<Vec<KeyInstance>, ToneError> {
    let count = key_count(start_note, start_octave, end_note, end_octave)?;
    let start_index = notes::note_index(start_note)?;

    let mut keys = Vec::with_capacity(count);
    let mut index = start_index;
    let mut octave = start_octave;
    for _ in 0..count {
        let note = &notes::NOTES[index];
        keys.push(KeyInstance {
            id: notes::key_id(index, octave),
            frequency: notes::frequency(reference, index, octave),
            label: notes::label(index, octave, style),
            raised: note.raised,
        });
        index += 1;
        if index == 12 {
            index = 0;
            octave += 1;
        }
    }
    Ok(keys)
}

/// The committed key set plus a generation counter.
///
/// The generation changes on every successful regeneration so host-side
/// bindings created for a previous layout can be told apart.
#[derive(Debug, Clone, Default)]
pub struct KeyLayout {
    keys: Vec<KeyInstance>,
    generation: u32,
}

impl KeyLayout {
    /// Replace the layout wholesale. On error the old layout is kept.
    pub fn regenerate(
        &mut self,
        range: &KeyRange,
        reference: f64,
        style: LabelStyle,
    ) -> Result<(), ToneError> {
        let keys = generate_keys(
            &range.start_note,
            range.start_octave,
            &range.end_note,
            range.end_octave,
            reference,
            style,
        )
        .inspect_err(|e| log::error!("key generation aborted: {e}"))?;

        self.keys = keys;
        self.generation = self.generation.wrapping_add(1);
        log::info!(
            "generated {} keys (generation {}) at A4 = {reference} Hz",
            self.keys.len(),
            self.generation
        );
        Ok(())
    }

    pub fn keys(&self) -> &[KeyInstance] {
        &self.keys
    }

    pub fn get(&self, id: &str) -> Option<&KeyInstance> {
        self.keys.iter().find(|k| k.id == id)
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
