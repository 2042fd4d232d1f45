//! # Kestrel Signals
//!
//! Streaming technical indicators over decimal price sequences.
//!
//! Batch entry points evaluate in 4-wide lanes and carry the exact
//! recurrence state across lane blocks and across calls, so they agree with
//! the scalar reference.

pub mod ema;
pub mod rsi;
pub mod engine;

pub use ema::{ema, ema_batched, Ema, LANES};
pub use rsi::{rsi, Rsi};
pub use engine::IndicatorEngine;
