//! Cycle notification — the engine's only output surface.
//!
//! The engine reports what it did through a callback trait so the CLI can
//! print and tests can capture. The line formats are fixed; both the stdout
//! and the recording implementations share them via [`action_line`].

use std::cell::RefCell;

use chrono::{DateTime, Local};

use crate::engine::EngineError;

/// An action the cycle driver carried out for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleAction {
    OpenedLong,
    OpenedShort,
    ClosedAll,
    ClosedLong,
    ClosedShort,
}

/// Callback interface for per-cycle status reporting.
pub trait CycleNotifier {
    /// Called once at the start of every scheduled cycle.
    fn on_cycle_start(&self, ts: DateTime<Local>);

    /// Called after each executed broker action.
    fn on_action(&self, symbol: &str, action: CycleAction);

    /// Called when a cycle aborts; the next scheduled cycle retries.
    fn on_cycle_error(&self, err: &EngineError);
}

/// The fixed status line for an aborted cycle. The cause is deliberately
/// not printed; the console surface stays stable regardless of what failed.
pub const ERROR_LINE: &str = "error encountered....skipping this iteration";

/// The fixed status line for an executed action.
pub fn action_line(symbol: &str, action: CycleAction) -> String {
    match action {
        CycleAction::OpenedLong => format!("New long position initiated for {symbol}"),
        CycleAction::OpenedShort => format!("New short position initiated for {symbol}"),
        CycleAction::ClosedAll => format!("All positions closed for {symbol}"),
        CycleAction::ClosedLong => format!("Existing long position closed for {symbol}"),
        CycleAction::ClosedShort => format!("Existing short position closed for {symbol}"),
    }
}

/// Prints status lines to stdout.
pub struct StdoutNotifier;

impl CycleNotifier for StdoutNotifier {
    fn on_cycle_start(&self, ts: DateTime<Local>) {
        println!("passthrough at {}", ts.format("%Y-%m-%d %H:%M:%S"));
    }

    fn on_action(&self, symbol: &str, action: CycleAction) {
        println!("{}", action_line(symbol, action));
    }

    fn on_cycle_error(&self, _err: &EngineError) {
        println!("{ERROR_LINE}");
    }
}

/// Collects status lines in memory. Test support.
#[derive(Default)]
pub struct RecordingNotifier {
    lines: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl CycleNotifier for RecordingNotifier {
    fn on_cycle_start(&self, ts: DateTime<Local>) {
        self.lines
            .borrow_mut()
            .push(format!("passthrough at {}", ts.format("%Y-%m-%d %H:%M:%S")));
    }

    fn on_action(&self, symbol: &str, action: CycleAction) {
        self.lines.borrow_mut().push(action_line(symbol, action));
    }

    fn on_cycle_error(&self, _err: &EngineError) {
        self.lines.borrow_mut().push(ERROR_LINE.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_lines_match_console_contract() {
        assert_eq!(
            action_line("EUR/USD", CycleAction::OpenedLong),
            "New long position initiated for EUR/USD"
        );
        assert_eq!(
            action_line("EUR/USD", CycleAction::OpenedShort),
            "New short position initiated for EUR/USD"
        );
        assert_eq!(
            action_line("EUR/USD", CycleAction::ClosedAll),
            "All positions closed for EUR/USD"
        );
        assert_eq!(
            action_line("EUR/USD", CycleAction::ClosedLong),
            "Existing long position closed for EUR/USD"
        );
        assert_eq!(
            action_line("EUR/USD", CycleAction::ClosedShort),
            "Existing short position closed for EUR/USD"
        );
    }

    #[test]
    fn error_line_is_fixed_regardless_of_cause() {
        use crate::broker::BrokerError;

        let notifier = RecordingNotifier::new();
        notifier.on_cycle_error(&EngineError::Broker(BrokerError::ConnectionFailure(
            "link down".into(),
        )));
        notifier.on_cycle_error(&EngineError::InsufficientHistory {
            symbol: "EUR/USD".into(),
            rows: 1,
            need: 2,
        });
        // One line per error, same text for every variant, no cause detail.
        assert_eq!(notifier.lines(), vec![ERROR_LINE.to_string(); 2]);
        assert_eq!(ERROR_LINE, "error encountered....skipping this iteration");
    }

    #[test]
    fn recording_notifier_captures_in_order() {
        let notifier = RecordingNotifier::new();
        notifier.on_action("EUR/USD", CycleAction::ClosedShort);
        notifier.on_action("EUR/USD", CycleAction::OpenedLong);
        assert_eq!(
            notifier.lines(),
            vec![
                "Existing short position closed for EUR/USD".to_string(),
                "New long position initiated for EUR/USD".to_string(),
            ]
        );
    }
}
