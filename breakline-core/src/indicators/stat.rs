//! Fully-populated statistic rows — the dropna step.
//!
//! The signal evaluator only ever looks at rows where ATR and both channel
//! bounds are defined. `enrich` computes all three series over a raw candle
//! fetch and keeps exactly those rows.

use crate::domain::Bar;
use crate::indicators::{atr, rolling_high, rolling_low};

/// One bar together with its derived statistics, all defined (non-NaN).
#[derive(Debug, Clone, PartialEq)]
pub struct StatBar {
    pub bar: Bar,
    /// Simple moving average of true range over the trailing window.
    pub atr: f64,
    /// Rolling max of highs over the trailing window (upper channel bound).
    pub upper: f64,
    /// Rolling min of lows over the trailing window (lower channel bound).
    pub lower: f64,
}

/// Compute ATR and channel bounds over `bars` with the given `window`, then
/// drop every row where any statistic is absent.
///
/// ATR is the binding constraint (first valid value at index `window`), so
/// for an input of length L >= window + 1 the result has exactly L - window
/// rows. Shorter input yields an empty Vec.
pub fn enrich(bars: &[Bar], window: usize) -> Vec<StatBar> {
    let atr_series = atr(bars, window);
    let upper_series = rolling_high(bars, window);
    let lower_series = rolling_low(bars, window);

    bars.iter()
        .enumerate()
        .filter_map(|(i, bar)| {
            let atr = atr_series[i];
            let upper = upper_series[i];
            let lower = lower_series[i];
            if atr.is_nan() || upper.is_nan() || lower.is_nan() {
                return None;
            }
            Some(StatBar {
                bar: bar.clone(),
                atr,
                upper,
                lower,
            })
        })
        .collect()
}
