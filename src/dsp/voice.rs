//! Voice — one sounding key: an oscillator shaped by a gain envelope.

use crate::instrument::InstrumentPreset;

use super::envelope::GainAutomation;
use super::oscillator::Oscillator;

/// A voice runs from its start until its scheduled stop, then ends.
#[derive(Debug, Clone)]
pub struct Voice {
    oscillator: Oscillator,
    gain: GainAutomation,
    stop_time: Option<f64>,
}

impl Voice {
    /// Start a voice at `now`, ramping linearly from silence to `peak`
    /// over the preset's attack time.
    pub fn start(
        frequency: f64,
        preset: &InstrumentPreset,
        peak: f64,
        now: f64,
        sample_rate: f64,
    ) -> Self {
        let mut gain = GainAutomation::new(0.0);
        gain.set_value_at(0.0, now);
        gain.linear_ramp_to(peak, now + preset.attack);

        Voice {
            oscillator: Oscillator::new(preset.waveform, frequency, sample_rate),
            gain,
            stop_time: None,
        }
    }

    /// Fade out exponentially toward `floor` over `duration` and schedule
    /// the stop at the end of the fade. Ignored once a stop is scheduled.
    pub fn release(&mut self, now: f64, duration: f64, floor: f64) -> bool {
        if self.stop_time.is_some() {
            return false;
        }
        self.fade_out(now, duration, floor);
        self.stop_time = Some(now + duration);
        true
    }

    /// Like [`release`](Self::release) but also applies to a releasing
    /// voice; the stop moves earlier, never later.
    pub fn force_release(&mut self, now: f64, duration: f64, floor: f64) {
        let stop = now + duration;
        match self.stop_time {
            Some(existing) if existing <= stop => {}
            _ => {
                self.fade_out(now, duration, floor);
                self.stop_time = Some(stop);
            }
        }
    }

    fn fade_out(&mut self, now: f64, duration: f64, floor: f64) {
        self.gain.cancel_and_hold_at(now);
        self.gain.exponential_ramp_to(floor, now + duration);
    }

    /// Sample at clock time `time`. Silent after the stop.
    pub fn next_sample(&mut self, time: f64) -> f64 {
        if self.has_ended(time) {
            return 0.0;
        }
        self.oscillator.next_sample() * self.gain_at(time)
    }

    pub fn is_releasing(&self) -> bool {
        self.stop_time.is_some()
    }

    pub fn has_ended(&self, time: f64) -> bool {
        self.stop_time.is_some_and(|stop| time >= stop)
    }

    pub fn stop_time(&self) -> Option<f64> {
        self.stop_time
    }

    pub fn gain_at(&self, time: f64) -> f64 {
        self.gain.value_at(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::Waveform;

    const SR: f64 = 44100.0;

    fn preset() -> InstrumentPreset {
        InstrumentPreset {
            waveform: Waveform::Triangle,
            attack: 0.05,
            release: 0.3,
        }
    }

    #[test]
    fn attack_reaches_peak() {
        let v = Voice::start(440.0, &preset(), 0.5, 1.0, SR);
        assert_eq!(v.gain_at(1.0), 0.0);
        assert!((v.gain_at(1.025) - 0.25).abs() < 1e-9);
        assert!((v.gain_at(1.05) - 0.5).abs() < 1e-9);
        assert!((v.gain_at(3.0) - 0.5).abs() < 1e-9);
        assert!(!v.is_releasing());
    }

    #[test]
    fn produces_sound() {
        let mut v = Voice::start(440.0, &preset(), 0.5, 0.0, SR);
        let loud = (0..4410)
            .map(|i| v.next_sample(i as f64 / SR))
            .any(|s| s.abs() > 0.01);
        assert!(loud, "Voice should produce non-zero output");
    }

    #[test]
    fn release_schedules_stop() {
        let mut v = Voice::start(440.0, &preset(), 0.5, 0.0, SR);
        assert!(v.release(1.0, 0.25, 0.001));
        assert_eq!(v.stop_time(), Some(1.25));
        assert!(v.is_releasing());
        assert!(!v.has_ended(1.24));
        assert!(v.has_ended(1.25));
        assert!((v.gain_at(1.25) - 0.001).abs() < 1e-12);
        assert_eq!(v.next_sample(1.4), 0.0);
        // Second release is ignored.
        assert!(!v.release(1.1, 0.25, 0.001));
        assert_eq!(v.stop_time(), Some(1.25));
    }

    #[test]
    fn release_during_attack_starts_from_current_level() {
        let mut v = Voice::start(440.0, &preset(), 0.5, 0.0, SR);
        v.release(0.025, 0.3, 0.001);
        assert!((v.gain_at(0.025) - 0.25).abs() < 1e-9);
        assert!(v.gain_at(0.1) < 0.25);
    }

    #[test]
    fn force_release_only_shortens() {
        let mut v = Voice::start(440.0, &preset(), 0.5, 0.0, SR);
        v.release(1.0, 0.8, 0.001);
        v.force_release(1.5, 0.25, 0.001);
        assert_eq!(v.stop_time(), Some(1.75));

        let mut w = Voice::start(440.0, &preset(), 0.5, 0.0, SR);
        w.release(1.0, 0.25, 0.001);
        w.force_release(1.125, 0.25, 0.001);
        assert_eq!(w.stop_time(), Some(1.25));
    }

    #[test]
    fn output_stays_in_range() {
        let mut v = Voice::start(880.0, &preset(), 0.5, 0.0, SR);
        for i in 0..44100 {
            let s = v.next_sample(i as f64 / SR);
            assert!(s.abs() <= 0.51, "Voice output out of range: {s}");
        }
    }
}
