//! Engine configuration, deserialized from the host page.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ToneError;
use crate::instrument::{Instrument, InstrumentPreset};
use crate::keyboard::KeyRange;
use crate::notes::LabelStyle;
use crate::tuning::TuningStandard;

/// Settings for a [`ToneEngine`](crate::engine::ToneEngine).
///
/// Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: f64,
    /// Initial A4 reference pitch.
    pub reference_pitch: TuningStandard,
    /// Initial instrument.
    pub instrument: Instrument,
    pub label_style: LabelStyle,
    pub range: KeyRange,
    /// Gain reached at the end of the attack.
    pub peak_level: f64,
    /// Level exponential releases aim for.
    pub release_floor: f64,
    /// Fade time used when silencing all voices, in seconds.
    pub silence_release: f64,
    pub master_gain: f64,
    /// Replacements for the built-in instrument presets.
    pub instruments: HashMap<Instrument, InstrumentPreset>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            sample_rate: 44100.0,
            reference_pitch: TuningStandard::Concert,
            instrument: Instrument::Flute,
            label_style: LabelStyle::Byzantine,
            range: KeyRange::default(),
            peak_level: 0.5,
            release_floor: 0.001,
            silence_release: 0.05,
            master_gain: 1.0,
            instruments: HashMap::new(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ToneError> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| ToneError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ToneError> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ToneError::Config(format!("{name} must be positive, got {v}")))
            }
        };
        positive("sampleRate", self.sample_rate)?;
        positive("silenceRelease", self.silence_release)?;
        positive("masterGain", self.master_gain)?;
        positive("releaseFloor", self.release_floor)?;
        if self.peak_level <= 0.0 || self.peak_level > 1.0 {
            return Err(ToneError::Config(format!(
                "peakLevel must be in (0, 1], got {}",
                self.peak_level
            )));
        }
        if self.release_floor >= self.peak_level {
            return Err(ToneError::Config(
                "releaseFloor must be below peakLevel".to_string(),
            ));
        }
        self.range
            .key_count()
            .map_err(|e| ToneError::Config(format!("range: {e}")))?;
        for (instrument, preset) in &self.instruments {
            positive(&format!("{instrument}.release"), preset.release)?;
            if !(preset.attack.is_finite() && preset.attack >= 0.0) {
                return Err(ToneError::Config(format!(
                    "{instrument}.attack must not be negative"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::Waveform;

    #[test]
    fn empty_object_is_default() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.range.start_note, "A");
        assert_eq!(config.range.end_octave, 5);
    }

    #[test]
    fn camel_case_fields() {
        let config = EngineConfig::from_json(
            r#"{
                "sampleRate": 48000,
                "referencePitch": 432,
                "instrument": "organ",
                "labelStyle": "western",
                "range": { "startNote": "C", "startOctave": 4, "endNote": "B", "endOctave": 4 },
                "instruments": { "organ": { "waveform": "sine", "attack": 0.01, "release": 0.5 } }
            }"#,
        )
        .unwrap();
        assert_eq!(config.sample_rate, 48000.0);
        assert_eq!(config.reference_pitch, TuningStandard::Verdi);
        assert_eq!(config.instrument, Instrument::Organ);
        assert_eq!(config.label_style, LabelStyle::Western);
        assert_eq!(config.range.start_octave, 4);
        assert_eq!(config.instruments[&Instrument::Organ].waveform, Waveform::Sine);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            EngineConfig::from_json(r#"{ "referencePitch": 450 }"#),
            Err(ToneError::Config(_))
        ));
        assert!(EngineConfig::from_json(r#"{ "sampleRate": 0 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "peakLevel": 1.5 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "releaseFloor": 0.6 }"#).is_err());
        assert!(EngineConfig::from_json("not json").is_err());
        assert!(matches!(
            EngineConfig::from_json(r#"{ "range": { "startOctave": -2147483648 } }"#),
            Err(ToneError::Config(_))
        ));
        assert!(EngineConfig::from_json(r#"{ "range": { "endNote": "H" } }"#).is_err());
        assert!(
            EngineConfig::from_json(
                r#"{ "instruments": { "flute": { "waveform": "triangle", "attack": -1, "release": 0.3 } } }"#
            )
            .is_err()
        );
    }
}
