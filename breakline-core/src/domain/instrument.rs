//! Static per-instrument configuration.

use serde::{Deserialize, Serialize};

/// One tradable instrument and the fixed size (in pips) taken per trade.
///
/// Loaded once at startup; the engine carries no other per-instrument state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    pub symbol: String,
    pub position_size: u32,
}

impl InstrumentConfig {
    pub fn new(symbol: impl Into<String>, position_size: u32) -> Self {
        Self {
            symbol: symbol.into(),
            position_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction() {
        let inst = InstrumentConfig::new("EUR/USD", 10);
        assert_eq!(inst.symbol, "EUR/USD");
        assert_eq!(inst.position_size, 10);
    }
}
