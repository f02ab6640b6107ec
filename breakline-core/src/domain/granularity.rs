//! Candle granularity label.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity of the candles the engine trades on.
///
/// The label is passed through to the broker's candle query; `step()` gives
/// the nominal duration of one candle (used by the paper broker to space
/// timestamps, never by the engine itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    M1,
    M5,
    M15,
    H1,
    D1,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M1 => "m1",
            Self::M5 => "m5",
            Self::M15 => "m15",
            Self::H1 => "h1",
            Self::D1 => "d1",
        }
    }

    /// Nominal duration of one candle.
    pub fn step(&self) -> chrono::Duration {
        match self {
            Self::M1 => chrono::Duration::minutes(1),
            Self::M5 => chrono::Duration::minutes(5),
            Self::M15 => chrono::Duration::minutes(15),
            Self::H1 => chrono::Duration::hours(1),
            Self::D1 => chrono::Duration::days(1),
        }
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Self::M1
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m1" => Ok(Self::M1),
            "m5" => Ok(Self::M5),
            "m15" => Ok(Self::M15),
            "h1" => Ok(Self::H1),
            "d1" => Ok(Self::D1),
            other => Err(format!(
                "unknown granularity '{other}' (expected one of: m1, m5, m15, h1, d1)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_roundtrip() {
        for label in ["m1", "m5", "m15", "h1", "d1"] {
            let g: Granularity = label.parse().unwrap();
            assert_eq!(g.to_string(), label);
        }
    }

    #[test]
    fn rejects_unknown_label() {
        assert!("w1".parse::<Granularity>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_labels() {
        let json = serde_json::to_string(&Granularity::M5).unwrap();
        assert_eq!(json, "\"m5\"");
        let back: Granularity = serde_json::from_str("\"h1\"").unwrap();
        assert_eq!(back, Granularity::H1);
    }

    #[test]
    fn step_durations() {
        assert_eq!(Granularity::M1.step(), chrono::Duration::minutes(1));
        assert_eq!(Granularity::D1.step(), chrono::Duration::days(1));
    }
}
