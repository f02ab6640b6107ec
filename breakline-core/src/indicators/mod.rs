//! Rolling statistics over bid candles.
//!
//! All indicator functions are pure: bar series in, `Vec<f64>` out, aligned
//! to the input with the warmup prefix filled with `f64::NAN`. NaN is the
//! "absent" marker throughout — `enrich` is the dropna step that keeps only
//! fully-populated rows for the signal evaluator.

pub mod atr;
pub mod channel;
pub mod stat;

pub use atr::{atr, true_range};
pub use channel::{rolling_high, rolling_low};
pub use stat::{enrich, StatBar};

pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Assert two floats are within epsilon. Panics with a readable message.
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() <= epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Create bars from (open, high, low, close) tuples for testing.
///
/// Timestamps step by one minute from a fixed origin.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Bar> {
    use chrono::TimeZone;

    let base = chrono::Utc
        .with_ymd_and_hms(2024, 1, 2, 9, 0, 0)
        .unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| crate::domain::Bar {
            timestamp: base + chrono::Duration::minutes(i as i64),
            open,
            high,
            low,
            close,
        })
        .collect()
}
