//! Domain types for the breakout engine.

pub mod bar;
pub mod granularity;
pub mod instrument;
pub mod position;

pub use bar::Bar;
pub use granularity::Granularity;
pub use instrument::InstrumentConfig;
pub use position::{PositionState, Signal};

/// Symbol type alias.
pub type Symbol = String;
