//! Breakline Runner — configuration and the fixed-cadence loop.
//!
//! This crate builds on `breakline-core` to provide:
//! - TOML run configuration with validation and engine-settings bridging
//! - The drift-compensated scheduler that drives one cycle per interval for
//!   a bounded total duration, with cooperative cancellation

pub mod config;
pub mod scheduler;

pub use config::{ConfigError, RunConfig};
pub use scheduler::{run_schedule, sleep_until_next, Schedule};
