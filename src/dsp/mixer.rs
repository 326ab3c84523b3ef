//! Mixer — sums voices for one render block and writes the host buffer.

/// Accumulates voice output for a block, then applies master gain and
/// soft clipping on the way out.
#[derive(Debug, Clone)]
pub struct Mixer {
    pub master_gain: f64,
    buffer: Vec<f64>,
}

impl Mixer {
    pub fn new(master_gain: f64) -> Self {
        Mixer {
            master_gain,
            buffer: Vec::new(),
        }
    }

    /// Start a block of `frames` silent frames.
    pub fn begin(&mut self, frames: usize) {
        self.buffer.clear();
        self.buffer.resize(frames, 0.0);
    }

    pub fn add(&mut self, frame: usize, sample: f64) {
        if let Some(slot) = self.buffer.get_mut(frame) {
            *slot += sample;
        }
    }

    /// Write the finished block into `out`, which must be at least as
    /// long as the block.
    pub fn write_to(&self, out: &mut [f32]) {
        for (dst, &s) in out.iter_mut().zip(&self.buffer) {
            *dst = soft_clip(s * self.master_gain) as f32;
        }
    }
}

/// tanh soft clipper; several full-level voices stay inside [-1, 1].
fn soft_clip(x: f64) -> f64 {
    x.tanh()
}
