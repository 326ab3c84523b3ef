//! DSP — synthesis primitives for the tone engine.
//!
//! Everything runs in Rust; the host only pulls rendered blocks into an
//! AudioWorklet.

pub mod envelope;
pub mod mixer;
pub mod oscillator;
pub mod voice;
