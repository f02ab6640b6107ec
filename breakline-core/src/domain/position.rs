//! Position state and the per-cycle trading signal.

use serde::{Deserialize, Serialize};

/// Current exposure for one instrument.
///
/// At most one logical position exists per instrument at any time — the
/// engine closes all exposure before reopening in the opposite direction
/// rather than netting. This state is derived fresh from the broker's open
/// positions every cycle; the engine never caches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionState {
    Flat,
    Long,
    Short,
}

impl PositionState {
    /// Build from a broker position direction flag.
    pub fn from_is_long(is_long: bool) -> Self {
        if is_long {
            Self::Long
        } else {
            Self::Short
        }
    }
}

/// Discrete decision for one instrument, produced and consumed within a
/// single cycle.
///
/// `CloseBuy` / `CloseSell` are same-cycle flips: close all exposure, then
/// immediately open the opposite side, so an opposite-direction breakout
/// does not wait for the next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Hold,
    Buy,
    Sell,
    Close,
    CloseBuy,
    CloseSell,
}
