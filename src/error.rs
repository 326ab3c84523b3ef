use thiserror::Error;

/// Everything that can go wrong inside the tone engine.
///
/// None of these are fatal: the engine logs the failure where it happens,
/// leaves its state untouched and stays interactive.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToneError {
    /// A note name that is not one of the 12 chromatic names.
    #[error("unknown note name \"{0}\"")]
    UnknownNote(String),
    /// A key identifier that does not parse as note name + octave.
    #[error("invalid key id \"{0}\"")]
    InvalidKeyId(String),
    /// Range bounds that would produce no keys.
    #[error("empty key range {start}..={end}")]
    EmptyRange { start: String, end: String },
    /// A range bound outside the octaves the keyboard can name.
    #[error("octave {0} is outside {min}..={max}", min = crate::keyboard::OCTAVES.start(), max = crate::keyboard::OCTAVES.end())]
    OctaveOutOfRange(i32),
    /// A reference pitch outside the supported tuning standards.
    #[error("unknown tuning standard \"{0}\"")]
    UnknownTuning(String),
    /// A well-formed key id that is not part of the current layout.
    #[error("key \"{0}\" is not on the keyboard")]
    UnknownKey(String),
    /// A trigger arrived before the host enabled audio output.
    #[error("audio output not initialized yet; interact with the page first")]
    AudioNotReady,
    /// Invalid engine configuration.
    #[error("invalid config: {0}")]
    Config(String),
}
