//! Average True Range (ATR).
//!
//! True Range: max(|high-low|, |high-prev_close|, |low-prev_close|).
//! ATR here is the simple moving average of TR over the trailing window —
//! not Wilder smoothing. The adaptive stop distance this engine uses is
//! defined on the SMA form.
//! Lookback: window (TR[0] has no previous close, so the first valid ATR
//! lands at index `window`).

use crate::domain::Bar;

/// Compute the True Range series from bars.
///
/// TR[0] = NaN (no previous close).
/// TR[t] = max(|high[t]-low[t]|, |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];

    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        if h.is_nan() || l.is_nan() || pc.is_nan() {
            tr[i] = f64::NAN;
        } else {
            tr[i] = (h - l).abs().max((h - pc).abs()).max((l - pc).abs());
        }
    }

    tr
}

/// Simple moving average of True Range over the trailing `window` values,
/// inclusive of the current bar.
///
/// The first `window` entries are NaN: TR[0] is always NaN, so the earliest
/// complete TR window ends at index `window`. A NaN anywhere in a window
/// makes that output NaN. Series shorter than `window + 1` bars yield an
/// all-NaN result — callers must reject or wait.
pub fn atr(bars: &[Bar], window: usize) -> Vec<f64> {
    assert!(window >= 1, "ATR window must be >= 1");

    let n = bars.len();
    let tr = true_range(bars);
    let mut result = vec![f64::NAN; n];

    if n < window {
        return result;
    }

    for i in (window - 1)..n {
        let start = i + 1 - window;
        let slice = &tr[start..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = slice.iter().sum::<f64>() / window as f64;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_bars, DEFAULT_EPSILON};

    #[test]
    fn true_range_basic() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = NaN (no prev close)
            (102.0, 108.0, 100.0, 106.0), // TR = max(8, |108-102|, |100-102|) = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = max(9, |107-106|, |98-106|) = 9
        ]);
        let tr = true_range(&bars);
        assert!(tr[0].is_nan());
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        // Gap up: prev close 100, current bar 115-108. TR = |115-100| = 15.
        let bars = make_ohlc_bars(&[
            (98.0, 102.0, 97.0, 100.0),
            (110.0, 115.0, 108.0, 112.0),
        ]);
        let tr = true_range(&bars);
        assert_approx(tr[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_dominates_high_low() {
        let bars = make_ohlc_bars(&[
            (100.0, 101.0, 99.0, 100.5),
            (100.0, 100.8, 99.9, 100.2),
        ]);
        let tr = true_range(&bars);
        assert!(tr[1] >= (bars[1].high - bars[1].low).abs());
        assert!(tr[1] >= 0.0);
    }

    #[test]
    fn atr_window_3_is_simple_mean() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // TR NaN
            (102.0, 108.0, 100.0, 106.0), // TR = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = 9
            (99.0, 103.0, 97.0, 101.0),   // TR = 6
            (101.0, 106.0, 100.0, 105.0), // TR = max(6, 5, 1) = 6
        ]);
        let result = atr(&bars, 3);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!(result[2].is_nan()); // window covers TR[0] = NaN
        assert_approx(result[3], (8.0 + 9.0 + 6.0) / 3.0, DEFAULT_EPSILON);
        assert_approx(result[4], (9.0 + 6.0 + 6.0) / 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_short_series_all_nan() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0),
            (106.0, 107.0, 98.0, 99.0),
        ]);
        // window 3 needs 4 bars before a value appears
        assert!(atr(&bars, 3).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn atr_nan_input_propagates() {
        let mut bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0),
            (106.0, 107.0, 98.0, 99.0),
            (99.0, 103.0, 97.0, 101.0),
        ]);
        bars[2].high = f64::NAN;
        let result = atr(&bars, 2);
        // TR[2] and TR[3]... only TR[2] is NaN (TR[3] uses close[2] which is fine)
        assert!(result[2].is_nan());
        assert!(result[3].is_nan()); // window [TR2, TR3] contains NaN
    }

    #[test]
    #[should_panic(expected = "ATR window must be >= 1")]
    fn atr_rejects_zero_window() {
        atr(&[], 0);
    }
}
