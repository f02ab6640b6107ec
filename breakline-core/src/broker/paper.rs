//! Paper broker — a deterministic in-process collaborator.
//!
//! Serves random-walk bid candles seeded per symbol, so a dry run is
//! reproducible and needs no account or network. Each `recent_bars` call
//! advances the walk by one candle, simulating time passing between cycles.
//! The position book holds at most one position per symbol, matching the
//! engine's close-all-before-open discipline.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{Bar, Granularity};

use super::{Broker, BrokerError, OpenPosition, OrderRequest};

/// In-process simulated broker.
pub struct PaperBroker {
    state: RefCell<Inner>,
    origin: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    series: HashMap<String, SymbolSeries>,
    positions: Vec<OpenPosition>,
}

struct SymbolSeries {
    rng: StdRng,
    last_close: f64,
    bars: Vec<Bar>,
}

impl PaperBroker {
    pub fn new() -> Self {
        Self::with_origin(Utc::now())
    }

    /// Fix the timestamp origin (first candle close time), for tests.
    pub fn with_origin(origin: DateTime<Utc>) -> Self {
        Self {
            state: RefCell::new(Inner::default()),
            origin,
        }
    }

    /// Open positions currently held in the simulated book.
    pub fn position_count(&self) -> usize {
        self.state.borrow().positions.len()
    }

    fn next_bar(series: &mut SymbolSeries, timestamp: DateTime<Utc>) -> Bar {
        let ret: f64 = series.rng.gen_range(-0.0030..0.0030);
        let open = series.last_close;
        let close = open * (1.0 + ret);
        let high = open.max(close) * (1.0 + series.rng.gen_range(0.0..0.0010));
        let low = open.min(close) * (1.0 - series.rng.gen_range(0.0..0.0010));
        series.last_close = close;
        Bar {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }
}

impl Default for PaperBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl Broker for PaperBroker {
    fn name(&self) -> &str {
        "paper"
    }

    fn open_positions(&self) -> Result<Vec<OpenPosition>, BrokerError> {
        Ok(self.state.borrow().positions.clone())
    }

    fn recent_bars(
        &self,
        symbol: &str,
        granularity: Granularity,
        count: usize,
    ) -> Result<Vec<Bar>, BrokerError> {
        let mut inner = self.state.borrow_mut();
        let series = inner
            .series
            .entry(symbol.to_string())
            .or_insert_with(|| {
                // Deterministic seed from the symbol name
                let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
                let mut rng = StdRng::from_seed(seed);
                let last_close = rng.gen_range(0.8..1.5);
                SymbolSeries {
                    rng,
                    last_close,
                    bars: Vec::new(),
                }
            });

        let step: Duration = granularity.step();
        // Backfill to the requested depth, then advance one candle per call.
        let target = count.max(series.bars.len() + 1);
        while series.bars.len() < target {
            let idx = series.bars.len() as i32;
            let ts = self.origin + step * idx;
            let bar = Self::next_bar(series, ts);
            series.bars.push(bar);
        }

        let start = series.bars.len().saturating_sub(count);
        Ok(series.bars[start..].to_vec())
    }

    fn open_order(&self, request: &OrderRequest) -> Result<(), BrokerError> {
        let mut inner = self.state.borrow_mut();
        if inner.positions.iter().any(|p| p.symbol == request.symbol) {
            return Err(BrokerError::OrderRejected {
                symbol: request.symbol.clone(),
                reason: "position already open".into(),
            });
        }
        inner.positions.push(OpenPosition {
            symbol: request.symbol.clone(),
            is_long: request.is_long,
        });
        Ok(())
    }

    fn close_all(&self, symbol: &str) -> Result<(), BrokerError> {
        self.state
            .borrow_mut()
            .positions
            .retain(|p| p.symbol != symbol);
        Ok(())
    }
}
