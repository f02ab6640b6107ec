//! The per-cycle position reconciler.
//!
//! `run_cycle` is one full pass over all configured instruments: read the
//! broker's open positions once, then per instrument fetch candles, rebuild
//! the rolling statistics from scratch, evaluate the signal against the
//! freshly derived position state, and translate it into broker actions.
//! Nothing is carried between cycles.
//!
//! Failure isolation is at cycle granularity: the first error aborts the
//! remaining instruments and propagates to the scheduler, which logs it and
//! waits for the next cycle. The fixed cadence is the retry mechanism —
//! there is no per-call retry and no rollback of actions already taken.

use thiserror::Error;

use crate::broker::{Broker, BrokerError, OrderRequest, OrderType, TimeInForce};
use crate::domain::{Granularity, InstrumentConfig, PositionState, Signal};
use crate::indicators::enrich;
use crate::notify::{CycleAction, CycleNotifier};
use crate::signal;

/// Errors from the cycle driver.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("broker error: {0}")]
    Broker(#[from] BrokerError),

    #[error("insufficient history for '{symbol}': {rows} usable rows after warmup, need {need}")]
    InsufficientHistory {
        symbol: String,
        rows: usize,
        need: usize,
    },
}

/// Static engine parameters, loaded once.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Instruments, processed in this order every cycle.
    pub instruments: Vec<InstrumentConfig>,
    /// Trailing window for ATR and channel bounds.
    pub window: usize,
    /// Candle granularity for the per-cycle fetch.
    pub granularity: Granularity,
    /// Raw candles fetched per instrument per cycle. A flat instrument
    /// needs one fully-populated row after warmup, a positioned one needs
    /// two; config validation requires >= window + 2 so neither case can
    /// starve.
    pub fetch_count: usize,
    /// Fixed stop-loss distance on every new order, in pips.
    pub stop_offset_pips: f64,
}

/// Capabilities and parameters handed into every cycle.
///
/// The broker connection is injected here rather than captured globally;
/// a cycle borrows it for its duration and holds no state afterwards.
pub struct CycleContext<'a> {
    pub broker: &'a dyn Broker,
    pub notifier: &'a dyn CycleNotifier,
    pub settings: &'a EngineSettings,
}

/// Run one cycle over all configured instruments.
///
/// Returns the signal decided for each instrument, in processing order.
/// On error the remaining instruments are skipped; actions already taken
/// stand.
pub fn run_cycle(ctx: &CycleContext) -> Result<Vec<(String, Signal)>, EngineError> {
    let open_positions = ctx.broker.open_positions()?;
    let mut decisions = Vec::with_capacity(ctx.settings.instruments.len());

    for instrument in &ctx.settings.instruments {
        // Ground truth, re-derived every cycle. Only the first matching
        // position is consulted; at most one is expected to exist.
        let state = open_positions
            .iter()
            .find(|p| p.symbol == instrument.symbol)
            .map(|p| PositionState::from_is_long(p.is_long))
            .unwrap_or(PositionState::Flat);

        let bars = ctx.broker.recent_bars(
            &instrument.symbol,
            ctx.settings.granularity,
            ctx.settings.fetch_count,
        )?;
        let rows = enrich(&bars, ctx.settings.window);

        // Entry rules read only the latest row; exit rules also read the
        // second-latest (previous close and ATR).
        let need = if state == PositionState::Flat { 1 } else { 2 };
        if rows.len() < need {
            return Err(EngineError::InsufficientHistory {
                symbol: instrument.symbol.clone(),
                rows: rows.len(),
                need,
            });
        }

        let latest = &rows[rows.len() - 1];
        let prev = rows.len().checked_sub(2).map(|i| &rows[i]);
        let decided = signal::evaluate(prev, latest, state);

        act_on(ctx, instrument, decided)?;
        decisions.push((instrument.symbol.clone(), decided));
    }

    Ok(decisions)
}

/// Translate one signal into broker actions, notifying each one.
///
/// Flips close all exposure first and only then open the opposite side —
/// the instrument is briefly flat in between, never netted.
fn act_on(
    ctx: &CycleContext,
    instrument: &InstrumentConfig,
    decided: Signal,
) -> Result<(), EngineError> {
    match decided {
        Signal::Hold => {}
        Signal::Buy => {
            ctx.broker.open_order(&order(instrument, ctx.settings, true))?;
            ctx.notifier
                .on_action(&instrument.symbol, CycleAction::OpenedLong);
        }
        Signal::Sell => {
            ctx.broker
                .open_order(&order(instrument, ctx.settings, false))?;
            ctx.notifier
                .on_action(&instrument.symbol, CycleAction::OpenedShort);
        }
        Signal::Close => {
            ctx.broker.close_all(&instrument.symbol)?;
            ctx.notifier
                .on_action(&instrument.symbol, CycleAction::ClosedAll);
        }
        Signal::CloseBuy => {
            ctx.broker.close_all(&instrument.symbol)?;
            ctx.notifier
                .on_action(&instrument.symbol, CycleAction::ClosedShort);
            ctx.broker.open_order(&order(instrument, ctx.settings, true))?;
            ctx.notifier
                .on_action(&instrument.symbol, CycleAction::OpenedLong);
        }
        Signal::CloseSell => {
            ctx.broker.close_all(&instrument.symbol)?;
            ctx.notifier
                .on_action(&instrument.symbol, CycleAction::ClosedLong);
            ctx.broker
                .open_order(&order(instrument, ctx.settings, false))?;
            ctx.notifier
                .on_action(&instrument.symbol, CycleAction::OpenedShort);
        }
    }
    Ok(())
}

fn order(instrument: &InstrumentConfig, settings: &EngineSettings, is_long: bool) -> OrderRequest {
    OrderRequest {
        symbol: instrument.symbol.clone(),
        is_long,
        size: instrument.position_size,
        time_in_force: TimeInForce::Gtc,
        stop_offset: settings.stop_offset_pips,
        order_type: OrderType::Market,
    }
}
