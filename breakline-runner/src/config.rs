//! Serializable run configuration.
//!
//! All fields default to the engine's stock parameters: six majors at 10
//! pips each, a 20-bar window over one-minute candles fetched 50 deep, an
//! 8-pip stop, a 120-second cadence bounded to one hour.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use breakline_core::{EngineSettings, Granularity, InstrumentConfig};

use crate::scheduler::Schedule;

/// Errors from loading or validating a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete configuration for one scheduled run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default)]
    pub strategy: StrategySection,
    #[serde(default)]
    pub orders: OrderSection,
    #[serde(default)]
    pub schedule: ScheduleSection,
}

/// `[strategy]` — what to trade and how the statistics are built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategySection {
    /// Instruments, processed in this order every cycle.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
    /// Trailing window for ATR and channel bounds.
    #[serde(default = "default_window")]
    pub window: usize,
    /// Candle granularity label.
    #[serde(default)]
    pub granularity: Granularity,
    /// Raw candles fetched per instrument per cycle.
    #[serde(default = "default_fetch_count")]
    pub fetch_count: usize,
}

/// `[orders]` — fixed order parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderSection {
    /// Position size in pips for every instrument.
    #[serde(default = "default_position_size")]
    pub position_size: u32,
    /// Stop-loss distance in pips on every new order.
    #[serde(default = "default_stop_offset")]
    pub stop_offset_pips: f64,
}

/// `[schedule]` — cadence and total run duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleSection {
    /// Seconds between cycle starts.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Total run duration in seconds.
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,
}

fn default_symbols() -> Vec<String> {
    ["EUR/USD", "EUR/JPY", "USD/JPY", "AUD/JPY", "AUD/NZD", "NZD/USD"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_window() -> usize {
    20
}

fn default_fetch_count() -> usize {
    50
}

fn default_position_size() -> u32 {
    10
}

fn default_stop_offset() -> f64 {
    8.0
}

fn default_interval_secs() -> u64 {
    120
}

fn default_duration_secs() -> u64 {
    3600
}

impl Default for StrategySection {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            window: default_window(),
            granularity: Granularity::default(),
            fetch_count: default_fetch_count(),
        }
    }
}

impl Default for OrderSection {
    fn default() -> Self {
        Self {
            position_size: default_position_size(),
            stop_offset_pips: default_stop_offset(),
        }
    }
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            duration_secs: default_duration_secs(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            strategy: StrategySection::default(),
            orders: OrderSection::default(),
            schedule: ScheduleSection::default(),
        }
    }
}

impl RunConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strategy.symbols.is_empty() {
            return Err(ConfigError::Invalid("symbol list is empty".into()));
        }
        if self.strategy.window < 2 {
            return Err(ConfigError::Invalid(format!(
                "window must be >= 2, got {}",
                self.strategy.window
            )));
        }
        // Two usable rows must survive warmup: exit rules read the
        // second-latest row, and a positioned instrument served only one
        // row would fail every cycle until the run ends.
        if self.strategy.fetch_count < self.strategy.window + 2 {
            return Err(ConfigError::Invalid(format!(
                "fetch_count {} leaves fewer than two usable rows after a {}-bar warmup (need >= {})",
                self.strategy.fetch_count,
                self.strategy.window,
                self.strategy.window + 2
            )));
        }
        if self.orders.position_size == 0 {
            return Err(ConfigError::Invalid("position_size must be > 0".into()));
        }
        if !(self.orders.stop_offset_pips > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "stop_offset_pips must be > 0, got {}",
                self.orders.stop_offset_pips
            )));
        }
        if self.schedule.interval_secs == 0 {
            return Err(ConfigError::Invalid("interval_secs must be > 0".into()));
        }
        if self.schedule.duration_secs == 0 {
            return Err(ConfigError::Invalid("duration_secs must be > 0".into()));
        }
        if self.schedule.interval_secs > self.schedule.duration_secs {
            return Err(ConfigError::Invalid(format!(
                "interval_secs {} exceeds duration_secs {}",
                self.schedule.interval_secs, self.schedule.duration_secs
            )));
        }
        Ok(())
    }

    /// Bridge to the core engine settings.
    pub fn to_engine_settings(&self) -> EngineSettings {
        EngineSettings {
            instruments: self
                .strategy
                .symbols
                .iter()
                .map(|s| InstrumentConfig::new(s.clone(), self.orders.position_size))
                .collect(),
            window: self.strategy.window,
            granularity: self.strategy.granularity,
            fetch_count: self.strategy.fetch_count,
            stop_offset_pips: self.orders.stop_offset_pips,
        }
    }

    /// The cadence this config asks for.
    pub fn to_schedule(&self) -> Schedule {
        Schedule {
            interval: Duration::from_secs(self.schedule.interval_secs),
            duration: Duration::from_secs(self.schedule.duration_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_stock_defaults() {
        let config = RunConfig::from_toml_str("").unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.strategy.window, 20);
        assert_eq!(config.strategy.granularity, Granularity::M1);
        assert_eq!(config.strategy.fetch_count, 50);
        assert_eq!(config.orders.position_size, 10);
        assert_eq!(config.orders.stop_offset_pips, 8.0);
        assert_eq!(config.schedule.interval_secs, 120);
        assert_eq!(config.schedule.duration_secs, 3600);
        assert_eq!(config.strategy.symbols.len(), 6);
    }

    #[test]
    fn partial_toml_overrides_selected_fields() {
        let config = RunConfig::from_toml_str(
            r#"
            [strategy]
            symbols = ["EUR/USD"]
            window = 14
            granularity = "m5"

            [schedule]
            interval_secs = 300
            duration_secs = 7200
            "#,
        )
        .unwrap();
        assert_eq!(config.strategy.symbols, vec!["EUR/USD".to_string()]);
        assert_eq!(config.strategy.window, 14);
        assert_eq!(config.strategy.granularity, Granularity::M5);
        // Untouched sections keep their defaults
        assert_eq!(config.orders.position_size, 10);
        assert_eq!(config.schedule.interval_secs, 300);
    }

    #[test]
    fn rejects_empty_symbols() {
        let err = RunConfig::from_toml_str("[strategy]\nsymbols = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_fetch_count_below_warmup() {
        let err = RunConfig::from_toml_str("[strategy]\nwindow = 20\nfetch_count = 20\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_fetch_count_with_a_single_usable_row() {
        // window + 1 raw bars leave exactly one row after warmup: enough
        // to enter but never enough to evaluate an exit, so a positioned
        // instrument would starve for the whole run. The boundary is
        // window + 2.
        let err = RunConfig::from_toml_str("[strategy]\nwindow = 10\nfetch_count = 11\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let ok = RunConfig::from_toml_str("[strategy]\nwindow = 10\nfetch_count = 12\n");
        assert!(ok.is_ok());
    }

    #[test]
    fn rejects_interval_longer_than_duration() {
        let err = RunConfig::from_toml_str(
            "[schedule]\ninterval_secs = 600\nduration_secs = 300\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = RunConfig::from_toml_str("[strategy]\nwidnow = 20\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn engine_settings_bridge() {
        let config = RunConfig::from_toml_str(
            r#"
            [strategy]
            symbols = ["EUR/USD", "USD/JPY"]

            [orders]
            position_size = 25
            stop_offset_pips = 5.0
            "#,
        )
        .unwrap();
        let settings = config.to_engine_settings();
        assert_eq!(settings.instruments.len(), 2);
        assert_eq!(settings.instruments[0].symbol, "EUR/USD");
        assert_eq!(settings.instruments[0].position_size, 25);
        assert_eq!(settings.stop_offset_pips, 5.0);
        assert_eq!(settings.window, 20);
    }

    #[test]
    fn schedule_bridge() {
        let schedule = RunConfig::default().to_schedule();
        assert_eq!(schedule.interval, Duration::from_secs(120));
        assert_eq!(schedule.duration, Duration::from_secs(3600));
    }
}
