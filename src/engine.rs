//! Tone Engine — owns the key layout, the active voices and the sample
//! clock, and renders mono blocks for the host's AudioWorklet.
//!
//! Per key id a voice goes Idle → Sounding (trigger) → Releasing (release
//! or silence-all) → Idle (its scheduled stop passes during rendering).
//! At most one voice exists per key id; triggers on a key that still has
//! a voice are ignored.

use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::dsp::mixer::Mixer;
use crate::dsp::voice::Voice;
use crate::error::ToneError;
use crate::input::{self, KeyAction, PointerKind};
use crate::instrument::{Instrument, InstrumentPreset, PresetTable};
use crate::keyboard::{KeyLayout, KeyRange};
use crate::notes;
use crate::tuning::TuningStandard;

/// Frames rendered per mixer pass.
const BLOCK_SIZE: usize = 128;

/// Lifecycle of the voice for one key id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,
    Sounding,
    Releasing,
}

/// A voice in the active map, tagged with its allocation serial.
#[derive(Debug)]
struct ActiveVoice {
    serial: u64,
    voice: Voice,
}

pub struct ToneEngine {
    config: EngineConfig,
    presets: PresetTable,
    tuning: TuningStandard,
    instrument: Instrument,
    /// Resolved once per instrument selection.
    preset: InstrumentPreset,
    layout: KeyLayout,
    voices: HashMap<String, ActiveVoice>,
    /// Voices cut loose by silence-all; they play out their short fade.
    fading: Vec<Voice>,
    /// Key ids whose voice was removed since the last `take_ended`.
    /// Each id appears at most once.
    ended: Vec<String>,
    mixer: Mixer,
    /// Frames rendered since audio was enabled.
    clock: u64,
    next_serial: u64,
    audio_ready: bool,
}

impl ToneEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ToneError> {
        config
            .validate()
            .inspect_err(|e| log::error!("rejected engine config: {e}"))?;

        let presets = PresetTable::with_overrides(config.instruments.clone());
        let preset = presets.get(config.instrument);
        let mut layout = KeyLayout::default();
        layout.regenerate(&config.range, config.reference_pitch.hz(), config.label_style)?;

        Ok(ToneEngine {
            presets,
            tuning: config.reference_pitch,
            instrument: config.instrument,
            preset,
            layout,
            voices: HashMap::new(),
            fading: Vec::new(),
            ended: Vec::new(),
            mixer: Mixer::new(config.master_gain),
            clock: 0,
            next_serial: 0,
            audio_ready: false,
            config,
        })
    }

    /// Current clock time in seconds.
    pub fn now(&self) -> f64 {
        self.clock as f64 / self.config.sample_rate
    }

    /// Enable audio output. Hosts call this from the first user gesture.
    pub fn resume_audio(&mut self) {
        if !self.audio_ready {
            self.audio_ready = true;
            log::info!("audio output initialized at {} Hz", self.config.sample_rate);
        }
    }

    pub fn is_audio_ready(&self) -> bool {
        self.audio_ready
    }

    /// Start a voice for `id`. `Ok(false)` when the key already has one.
    pub fn trigger(&mut self, id: &str) -> Result<bool, ToneError> {
        if !self.audio_ready {
            log::warn!("ignoring {id}: {}", ToneError::AudioNotReady);
            return Err(ToneError::AudioNotReady);
        }
        notes::parse_key_id(id).inspect_err(|e| log::warn!("{e}"))?;
        let Some(key) = self.layout.get(id) else {
            let err = ToneError::UnknownKey(id.to_string());
            log::warn!("{err}");
            return Err(err);
        };
        if self.voices.contains_key(id) {
            return Ok(false);
        }

        let voice = Voice::start(
            key.frequency,
            &self.preset,
            self.config.peak_level,
            self.now(),
            self.config.sample_rate,
        );
        log::debug!("{id} on at {:.2} Hz ({})", key.frequency, self.instrument);

        self.next_serial += 1;
        self.voices.insert(
            id.to_string(),
            ActiveVoice {
                serial: self.next_serial,
                voice,
            },
        );
        Ok(true)
    }

    /// Begin the release of a sounding key. `false` when there is
    /// nothing to release.
    pub fn release(&mut self, id: &str) -> bool {
        let now = self.now();
        let duration = self.preset.release;
        let floor = self.config.release_floor;
        match self.voices.get_mut(id) {
            Some(active) => {
                let released = active.voice.release(now, duration, floor);
                if let Some(stop) = active.voice.stop_time()
                    && released
                {
                    log::debug!("{id} released, stops at {stop:.3}s");
                }
                released
            }
            None => false,
        }
    }

    /// Fade out every voice quickly and empty the active map.
    pub fn silence_all(&mut self) {
        if self.voices.is_empty() {
            return;
        }
        let now = self.now();
        let duration = self.config.silence_release;
        let floor = self.config.release_floor;
        log::debug!("silencing {} voices", self.voices.len());
        for (id, mut active) in std::mem::take(&mut self.voices) {
            active.voice.force_release(now, duration, floor);
            self.fading.push(active.voice);
            self.note_ended(id);
        }
    }

    /// Selector entry point for the tuning radio group.
    pub fn set_reference_pitch(&mut self, value: &str) -> Result<(), ToneError> {
        let tuning = value
            .parse::<TuningStandard>()
            .inspect_err(|e| log::error!("{e}"))?;
        self.set_tuning(tuning)
    }

    /// Silence everything and rebuild the keys under `tuning`.
    pub fn set_tuning(&mut self, tuning: TuningStandard) -> Result<(), ToneError> {
        self.silence_all();
        self.layout
            .regenerate(&self.config.range, tuning.hz(), self.config.label_style)?;
        self.tuning = tuning;
        log::info!("tuning set to {tuning}");
        Ok(())
    }

    /// Replace the keyboard range. On error nothing changes.
    pub fn set_range(&mut self, range: KeyRange) -> Result<(), ToneError> {
        let mut layout = self.layout.clone();
        layout.regenerate(&range, self.tuning.hz(), self.config.label_style)?;
        self.silence_all();
        self.layout = layout;
        self.config.range = range;
        Ok(())
    }

    /// Selector entry point for the instrument dropdown.
    pub fn set_instrument(&mut self, value: &str) {
        self.select_instrument(Instrument::from_selector(value));
    }

    pub fn select_instrument(&mut self, instrument: Instrument) {
        self.silence_all();
        self.instrument = instrument;
        self.preset = self.presets.get(instrument);
        log::info!(
            "instrument set to {instrument} ({:?}, attack {}s, release {}s)",
            self.preset.waveform,
            self.preset.attack,
            self.preset.release
        );
    }

    /// Pointer or touch event on a key element. `generation` is the
    /// layout generation the host bound its listener under, if known.
    pub fn pointer(&mut self, id: &str, kind: PointerKind, generation: Option<u32>) -> bool {
        if let Some(bound) = generation
            && bound != self.layout.generation()
        {
            log::debug!(
                "ignoring {kind:?} on {id}: bound to layout {bound}, current is {}",
                self.layout.generation()
            );
            return false;
        }
        match kind.action() {
            KeyAction::Trigger => self.trigger(id).unwrap_or(false),
            KeyAction::Release => self.release(id),
        }
    }

    /// Computer keyboard key-down. Auto-repeat never retriggers.
    pub fn key_down(&mut self, key: &str, repeat: bool) -> bool {
        if repeat {
            return false;
        }
        match self.bound_on_layout(key) {
            Some(id) => self.trigger(id).unwrap_or(false),
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match self.bound_on_layout(key) {
            Some(id) => self.release(id),
            None => false,
        }
    }

    fn bound_on_layout(&self, key: &str) -> Option<&'static str> {
        let id = input::bound_key(key)?;
        if self.layout.get(id).is_none() {
            log::debug!("key \"{key}\" is bound to {id}, which is not on the keyboard");
            return None;
        }
        Some(id)
    }

    /// Render the next `out.len()` frames. Writes silence and leaves the
    /// clock alone until audio has been enabled.
    pub fn render(&mut self, out: &mut [f32]) {
        if !self.audio_ready {
            out.fill(0.0);
            return;
        }

        let sample_rate = self.config.sample_rate;
        for block in out.chunks_mut(BLOCK_SIZE) {
            let frames = block.len();
            let start = self.clock;
            self.mixer.begin(frames);

            let voices = self
                .voices
                .values_mut()
                .map(|a| &mut a.voice)
                .chain(self.fading.iter_mut());
            for voice in voices {
                for i in 0..frames {
                    let t = (start + i as u64) as f64 / sample_rate;
                    self.mixer.add(i, voice.next_sample(t));
                }
            }
            self.mixer.write_to(block);

            self.clock += frames as u64;
            self.collect_finished();
        }
    }

    /// Drop voices whose stop time has passed.
    fn collect_finished(&mut self) {
        let now = self.now();
        let finished: Vec<String> = self
            .voices
            .iter()
            .filter(|(_, a)| a.voice.has_ended(now))
            .map(|(id, _)| id.clone())
            .collect();
        for id in finished {
            self.voices.remove(&id);
            log::debug!("{id} stopped");
            self.note_ended(id);
        }
        self.fading.retain(|v| !v.has_ended(now));
    }

    /// Queue `id` for `take_ended` unless it is already queued, so the
    /// queue never holds more entries than there are keys.
    fn note_ended(&mut self, id: String) {
        if !self.ended.contains(&id) {
            self.ended.push(id);
        }
    }

    /// Key ids whose voice went away since the last call.
    pub fn take_ended(&mut self) -> Vec<String> {
        std::mem::take(&mut self.ended)
    }

    pub fn voice_state(&self, id: &str) -> VoiceState {
        match self.voices.get(id) {
            None => VoiceState::Idle,
            Some(a) if a.voice.is_releasing() => VoiceState::Releasing,
            Some(_) => VoiceState::Sounding,
        }
    }

    /// Sounding keys get the "active" highlight.
    pub fn is_active(&self, id: &str) -> bool {
        self.voice_state(id) == VoiceState::Sounding
    }

    /// Allocation serial of the voice on `id`.
    pub fn voice_serial(&self, id: &str) -> Option<u64> {
        self.voices.get(id).map(|a| a.serial)
    }

    pub fn active_voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn fading_voice_count(&self) -> usize {
        self.fading.len()
    }

    pub fn layout(&self) -> &KeyLayout {
        &self.layout
    }

    pub fn tuning(&self) -> TuningStandard {
        self.tuning
    }

    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    pub fn preset(&self) -> &InstrumentPreset {
        &self.preset
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
