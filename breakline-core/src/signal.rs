//! The breakout / exit signal state machine.
//!
//! A pure function of the trailing two fully-populated rows and the current
//! position state. No I/O, no side effects: the cycle driver owns the
//! translation of the returned [`Signal`] into broker actions.
//!
//! Transition table (current position state is the state, the returned
//! signal is the transition trigger):
//!
//! - **Flat**: new window high => `Buy`; else new window low => `Sell`.
//!   The Buy check runs first, so a bar that sets both extremes buys.
//! - **Long**: close fell by more than the previous ATR => `Close`
//!   (volatility stop); else new window low => `CloseSell` (flip to short).
//!   The stop check runs before the reversal check.
//! - **Short**: new window high => `CloseBuy` (flip to long); else close
//!   rose by more than the previous ATR => `Close`. Here the reversal check
//!   runs before the stop check — the opposite order from the Long branch.
//!   That asymmetry is inherited behavior and is pinned by tests; do not
//!   reorder it without a product decision.

use crate::domain::{PositionState, Signal};
use crate::indicators::StatBar;

/// Evaluate the signal for one instrument.
///
/// `latest` is the most recent fully-populated row; `prev` the one before
/// it. The exit rules compare the latest close against the previous close
/// shifted by the previous ATR, so `prev` is required whenever a position
/// is open. With an open position and no `prev` row the evaluator holds —
/// the cycle driver refuses to get into that situation by demanding two
/// rows when positioned.
pub fn evaluate(prev: Option<&StatBar>, latest: &StatBar, state: PositionState) -> Signal {
    match state {
        PositionState::Flat => {
            if latest.bar.high >= latest.upper {
                Signal::Buy
            } else if latest.bar.low <= latest.lower {
                Signal::Sell
            } else {
                Signal::Hold
            }
        }
        PositionState::Long => {
            let Some(prev) = prev else {
                return Signal::Hold;
            };
            if latest.bar.close <= prev.bar.close - prev.atr {
                Signal::Close
            } else if latest.bar.low <= latest.lower {
                Signal::CloseSell
            } else {
                Signal::Hold
            }
        }
        PositionState::Short => {
            let Some(prev) = prev else {
                return Signal::Hold;
            };
            if latest.bar.high >= latest.upper {
                Signal::CloseBuy
            } else if latest.bar.close >= prev.bar.close + prev.atr {
                Signal::Close
            } else {
                Signal::Hold
            }
        }
    }
}
