//! Anti-aliased oscillators using PolyBLEP.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// Supported waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    #[serde(alias = "saw")]
    Sawtooth,
    Triangle,
}

/// A band-limited oscillator at a fixed frequency.
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub waveform: Waveform,
    phase: f64,
    phase_inc: f64,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f64, sample_rate: f64) -> Self {
        Oscillator {
            waveform,
            phase: 0.0,
            phase_inc: frequency / sample_rate,
        }
    }

    /// Generate the next sample in [-1, 1] (overshoot of a few percent
    /// around the PolyBLEP corrected edges).
    pub fn next_sample(&mut self) -> f64 {
        let t = self.phase;
        let dt = self.phase_inc;
        let sample = match self.waveform {
            Waveform::Sine => (TAU * t).sin(),
            Waveform::Sawtooth => 2.0 * t - 1.0 - poly_blep(t, dt),
            Waveform::Square => {
                let naive = if t < 0.5 { 1.0 } else { -1.0 };
                naive + poly_blep(t, dt) - poly_blep((t + 0.5) % 1.0, dt)
            }
            // Slope discontinuities only, no step correction needed.
            Waveform::Triangle => {
                if t < 0.5 {
                    4.0 * t - 1.0
                } else {
                    3.0 - 4.0 * t
                }
            }
        };

        self.phase += dt;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        sample
    }
}

/// PolyBLEP correction for a unit step at phase 0.
///
/// `t` is the phase in [0, 1), `dt` the phase increment per sample.
fn poly_blep(t: f64, dt: f64) -> f64 {
    if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}
