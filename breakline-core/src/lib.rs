//! Breakline Core — channel-breakout decision engine.
//!
//! This crate contains the heart of the live trading loop:
//! - Domain types (bars, position state, signals, instruments)
//! - Indicators (true range, ATR, rolling high/low channel)
//! - The pure signal state machine (breakout entries, ATR-stop exits, flips)
//! - The abstract broker collaborator trait plus a deterministic paper broker
//! - The per-instrument cycle driver that reconciles position state against
//!   the latest signal once per scheduled pass
//!
//! Everything is recomputed from scratch every cycle: position state is
//! re-read from the broker, derived statistics are rebuilt from the candle
//! fetch, and signals are consumed within the cycle that produced them.

pub mod broker;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod notify;
pub mod signal;

pub use broker::{Broker, BrokerError, OpenPosition, OrderRequest, OrderType, PaperBroker, TimeInForce};
pub use domain::{Bar, Granularity, InstrumentConfig, PositionState, Signal};
pub use engine::{run_cycle, CycleContext, EngineError, EngineSettings};
pub use indicators::{enrich, StatBar};
pub use notify::{CycleAction, CycleNotifier, RecordingNotifier, StdoutNotifier};
