//! # Kestrel Core
//!
//! Fixed-point price-level book and shared kernel types.
//!
//! ## Design Principles
//! - No allocation on the book mutation path
//! - Fixed-point arithmetic for prices and quantities
//! - Single writer per book, lock-free top-of-book readers
//! - Every operation is all-or-nothing

pub mod error;
pub mod fixed;
pub mod types;
pub mod level;
pub mod snapshot;
pub mod book;
pub mod config;

pub use error::{try_buffer, KernelError, Result};
pub use fixed::{FixedPointScaler, Price, Quantity, DEFAULT_DECIMALS, MAX_DECIMALS};
pub use types::{BookAction, InstrumentId, Side, SymbolId};
pub use level::{LevelSide, PriceLevel, Upsert, DEFAULT_DEPTH};
pub use snapshot::{SnapshotCell, TopOfBook, TopOfBookReader};
pub use book::{PriceLevelBook, UpdateResult};
pub use config::{
    BookConfig, ConfigError, FeedConfig, KernelConfig, RiskConfig, ScalerConfig, SignalConfig,
};
