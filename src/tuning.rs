//! Reference pitch standards for A4.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ToneError;

/// The supported A4 reference pitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum TuningStandard {
    /// A4 = 415 Hz.
    Baroque,
    /// A4 = 432 Hz.
    Verdi,
    /// A4 = 440 Hz (ISO 16).
    #[default]
    Concert,
    /// A4 = 442 Hz.
    Orchestral,
    /// A4 = 444 Hz.
    Bright,
}

impl TuningStandard {
    pub const ALL: [TuningStandard; 5] = [
        TuningStandard::Baroque,
        TuningStandard::Verdi,
        TuningStandard::Concert,
        TuningStandard::Orchestral,
        TuningStandard::Bright,
    ];

    /// Frequency of A4 in Hz.
    pub fn hz(self) -> f64 {
        match self {
            TuningStandard::Baroque => 415.0,
            TuningStandard::Verdi => 432.0,
            TuningStandard::Concert => 440.0,
            TuningStandard::Orchestral => 442.0,
            TuningStandard::Bright => 444.0,
        }
    }

    /// Look up the standard whose pitch is exactly `hz`.
    pub fn from_hz(hz: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.hz() == hz)
    }

    /// Reference pitch as presented next to the selector, e.g. "440.000".
    pub fn display(self) -> String {
        format!("{:.3}", self.hz())
    }
}

impl FromStr for TuningStandard {
    type Err = ToneError;

    /// Parse a selector value such as "432" or "440.0".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<f64>()
            .ok()
            .and_then(Self::from_hz)
            .ok_or_else(|| ToneError::UnknownTuning(s.to_string()))
    }
}

impl TryFrom<f64> for TuningStandard {
    type Error = ToneError;

    fn try_from(hz: f64) -> Result<Self, Self::Error> {
        Self::from_hz(hz).ok_or_else(|| ToneError::UnknownTuning(hz.to_string()))
    }
}

impl From<TuningStandard> for f64 {
    fn from(t: TuningStandard) -> f64 {
        t.hz()
    }
}

impl fmt::Display for TuningStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A4 = {} Hz", self.hz())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_selector_values() {
        assert_eq!("440".parse::<TuningStandard>(), Ok(TuningStandard::Concert));
        assert_eq!("432.0".parse::<TuningStandard>(), Ok(TuningStandard::Verdi));
        assert_eq!(" 442 ".parse::<TuningStandard>(), Ok(TuningStandard::Orchestral));
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(matches!(
            "441".parse::<TuningStandard>(),
            Err(ToneError::UnknownTuning(_))
        ));
        assert!("abc".parse::<TuningStandard>().is_err());
        assert!(TuningStandard::try_from(f64::NAN).is_err());
    }

    #[test]
    fn display_uses_three_decimals() {
        assert_eq!(TuningStandard::Verdi.display(), "432.000");
        assert_eq!(TuningStandard::default().hz(), 440.0);
    }

    #[test]
    fn serde_uses_plain_numbers() {
        let json = serde_json::to_string(&TuningStandard::Bright).unwrap();
        assert_eq!(json, "444.0");
        let t: TuningStandard = serde_json::from_str("415").unwrap();
        assert_eq!(t, TuningStandard::Baroque);
        assert!(serde_json::from_str::<TuningStandard>("400").is_err());
    }
}
