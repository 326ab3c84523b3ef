//! Instruments and their synthesis presets.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::Waveform;

/// The selectable instrument timbres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    #[default]
    Flute,
    Trumpet,
    Organ,
    Guitar,
}

/// Waveform and envelope timing for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstrumentPreset {
    pub waveform: Waveform,
    /// Seconds from silence to peak.
    pub attack: f64,
    /// Seconds from release to stop.
    pub release: f64,
}

impl Instrument {
    pub const ALL: [Instrument; 4] = [
        Instrument::Flute,
        Instrument::Trumpet,
        Instrument::Organ,
        Instrument::Guitar,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Instrument::Flute => "flute",
            Instrument::Trumpet => "trumpet",
            Instrument::Organ => "organ",
            Instrument::Guitar => "guitar",
        }
    }

    /// Built-in preset.
    pub fn preset(self) -> InstrumentPreset {
        let (waveform, attack, release) = match self {
            Instrument::Flute => (Waveform::Triangle, 0.05, 0.3),
            Instrument::Trumpet => (Waveform::Sawtooth, 0.1, 0.8),
            Instrument::Organ => (Waveform::Square, 0.02, 0.1),
            Instrument::Guitar => (Waveform::Sawtooth, 0.005, 0.1),
        };
        InstrumentPreset { waveform, attack, release }
    }

    /// Resolve a selector value. Unknown values play as the flute.
    pub fn from_selector(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            log::warn!("unknown instrument \"{value}\", using flute");
            Instrument::Flute
        })
    }
}

impl FromStr for Instrument {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flute" => Ok(Instrument::Flute),
            "trumpet" | "brass" => Ok(Instrument::Trumpet),
            "organ" => Ok(Instrument::Organ),
            "guitar" | "pluck" => Ok(Instrument::Guitar),
            other => Err(format!("unknown instrument \"{other}\"")),
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Preset table with optional per-instrument overrides.
#[derive(Debug, Clone, Default)]
pub struct PresetTable {
    overrides: HashMap<Instrument, InstrumentPreset>,
}

impl PresetTable {
    pub fn with_overrides(overrides: HashMap<Instrument, InstrumentPreset>) -> Self {
        PresetTable { overrides }
    }

    pub fn get(&self, instrument: Instrument) -> InstrumentPreset {
        self.overrides
            .get(&instrument)
            .copied()
            .unwrap_or_else(|| instrument.preset())
    }
}
