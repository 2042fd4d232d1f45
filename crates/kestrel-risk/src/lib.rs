//! Pre-trade risk checks.
//!
//! Batch validation of candidate orders against position and price limits,
//! a parametric portfolio risk estimate and a packed single-order fast path.

pub mod positions;
pub mod validator;
pub mod portfolio;
pub mod packed;

pub use positions::PositionSnapshot;
pub use validator::{validate_batch, RejectReason, RiskValidator};
pub use portfolio::{parametric_var, portfolio_variance};
pub use packed::{position_within_limit, PackedLimits, PackedOrder};
