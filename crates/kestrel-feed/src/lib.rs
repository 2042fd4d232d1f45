//! Tick ingestion.
//!
//! Converts raw decimal ticks into scaled fixed-point events and aggregates
//! scaled events into OHLC bars.

pub mod processor;
pub mod bars;

pub use processor::TickBatchProcessor;
pub use bars::{ohlc_bars, Bar};
