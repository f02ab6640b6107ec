//! Price channel — rolling highest high / lowest low over a trailing window.
//!
//! The breakout rules compare the latest bar against these bounds: a new
//! window extreme on the high side is an upside breakout, on the low side a
//! downside breakout.
//! Lookback: window - 1.

use crate::domain::Bar;

/// Rolling max of highs over the trailing `window` bars, inclusive of the
/// current bar. First `window - 1` entries are NaN.
pub fn rolling_high(bars: &[Bar], window: usize) -> Vec<f64> {
    assert!(window >= 1, "channel window must be >= 1");
    rolling_extreme(bars, window, |bar| bar.high, f64::max, f64::NEG_INFINITY)
}

/// Rolling min of lows over the trailing `window` bars, inclusive of the
/// current bar. First `window - 1` entries are NaN.
pub fn rolling_low(bars: &[Bar], window: usize) -> Vec<f64> {
    assert!(window >= 1, "channel window must be >= 1");
    rolling_extreme(bars, window, |bar| bar.low, f64::min, f64::INFINITY)
}

fn rolling_extreme(
    bars: &[Bar],
    window: usize,
    field: impl Fn(&Bar) -> f64,
    fold: impl Fn(f64, f64) -> f64,
    identity: f64,
) -> Vec<f64> {
    let n = bars.len();
    let mut result = vec![f64::NAN; n];

    if n < window {
        return result;
    }

    for i in (window - 1)..n {
        let start = i + 1 - window;
        let mut acc = identity;
        let mut has_nan = false;
        for bar in &bars[start..=i] {
            let v = field(bar);
            if v.is_nan() {
                has_nan = true;
                break;
            }
            acc = fold(acc, v);
        }
        result[i] = if has_nan { f64::NAN } else { acc };
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_bars, DEFAULT_EPSILON};

    #[test]
    fn rolling_high_3() {
        let bars = make_ohlc_bars(&[
            (10.0, 12.0, 9.0, 11.0),
            (11.0, 15.0, 10.0, 14.0),
            (14.0, 14.0, 13.0, 13.5),
            (13.5, 16.0, 12.0, 15.0),
            (15.0, 15.5, 14.0, 14.5),
        ]);
        let result = rolling_high(&bars, 3);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 15.0, DEFAULT_EPSILON); // max(12, 15, 14)
        assert_approx(result[3], 16.0, DEFAULT_EPSILON); // max(15, 14, 16)
        assert_approx(result[4], 16.0, DEFAULT_EPSILON); // max(14, 16, 15.5)
    }

    #[test]
    fn rolling_low_3() {
        let bars = make_ohlc_bars(&[
            (10.0, 12.0, 9.0, 11.0),
            (11.0, 15.0, 10.0, 14.0),
            (14.0, 14.0, 13.0, 13.5),
            (13.5, 16.0, 12.0, 15.0),
            (15.0, 15.5, 14.0, 14.5),
        ]);
        let result = rolling_low(&bars, 3);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 9.0, DEFAULT_EPSILON); // min(9, 10, 13)
        assert_approx(result[3], 10.0, DEFAULT_EPSILON); // min(10, 13, 12)
        assert_approx(result[4], 12.0, DEFAULT_EPSILON); // min(13, 12, 14)
    }

    #[test]
    fn window_includes_current_bar() {
        let bars = make_ohlc_bars(&[
            (10.0, 12.0, 9.0, 11.0),
            (11.0, 20.0, 8.0, 14.0),
        ]);
        let hi = rolling_high(&bars, 2);
        let lo = rolling_low(&bars, 2);
        assert_approx(hi[1], 20.0, DEFAULT_EPSILON);
        assert_approx(lo[1], 8.0, DEFAULT_EPSILON);
    }

    #[test]
    fn nan_propagation() {
        let mut bars = make_ohlc_bars(&[
            (10.0, 12.0, 9.0, 11.0),
            (11.0, 15.0, 10.0, 14.0),
            (14.0, 14.0, 13.0, 13.5),
        ]);
        bars[1].high = f64::NAN;
        bars[1].low = f64::NAN;
        assert!(rolling_high(&bars, 3)[2].is_nan());
        assert!(rolling_low(&bars, 3)[2].is_nan());
    }

    #[test]
    fn short_series_all_nan() {
        let bars = make_ohlc_bars(&[(10.0, 12.0, 9.0, 11.0)]);
        assert!(rolling_high(&bars, 3).iter().all(|v| v.is_nan()));
        assert!(rolling_low(&bars, 3).iter().all(|v| v.is_nan()));
    }
}
