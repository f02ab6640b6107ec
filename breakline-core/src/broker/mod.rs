//! The abstract market/broker collaborator.
//!
//! The engine is deliberately thin on this side: it needs to read open
//! positions, read recent candles, submit a fixed-size GTC market order,
//! and close all exposure for a symbol. Everything else a real broker
//! session involves (authentication, token handling, transport) lives
//! behind an implementation of this trait and is not the engine's concern.

pub mod paper;

pub use paper::PaperBroker;

use crate::domain::{Bar, Granularity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One open position as reported by the broker.
///
/// The engine consults only the first entry matching a symbol — at most one
/// open position per instrument is expected to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub symbol: String,
    pub is_long: bool,
}

/// Order duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good till cancelled.
    Gtc,
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// Execute at the current market price.
    Market,
}

/// A new-order submission.
///
/// Always a fixed-size market order, good till cancelled, with a fixed
/// stop-loss offset in pips and no trailing stop. `stop_offset` is a
/// positive distance; signing it appropriately for the order direction is
/// the broker implementation's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub is_long: bool,
    /// Position size in pips.
    pub size: u32,
    pub time_in_force: TimeInForce,
    /// Stop-loss distance from entry, in pips.
    pub stop_offset: f64,
    pub order_type: OrderType,
}

/// Structured error types for broker operations.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("connection failure: {0}")]
    ConnectionFailure(String),

    #[error("order rejected for '{symbol}': {reason}")]
    OrderRejected { symbol: String, reason: String },
}

/// Trait for the external market/broker collaborator.
///
/// Implementations take `&self`; the engine is single-threaded and
/// synchronous, so stateful implementations (the paper broker, test mocks)
/// use interior mutability rather than locks.
pub trait Broker {
    /// Human-readable name of this broker.
    fn name(&self) -> &str;

    /// All currently open positions across symbols, or empty.
    fn open_positions(&self) -> Result<Vec<OpenPosition>, BrokerError>;

    /// The most recent `count` candles for `symbol`, oldest first.
    fn recent_bars(
        &self,
        symbol: &str,
        granularity: Granularity,
        count: usize,
    ) -> Result<Vec<Bar>, BrokerError>;

    /// Submit one new market order.
    fn open_order(&self, request: &OrderRequest) -> Result<(), BrokerError>;

    /// Close every open position for `symbol`.
    fn close_all(&self, symbol: &str) -> Result<(), BrokerError>;
}
