//! Batch order validation against position and price limits.
//!
//! Every order in a batch is checked against the same position snapshot;
//! accepted orders earlier in the batch do not move the positions seen by
//! later ones.

use kestrel_core::{try_buffer, KernelError, Result, SymbolId};
use kestrel_proto::{LimitSet, OrderRecord};
use thiserror::Error;
use tracing::debug;

use crate::positions::PositionSnapshot;

/// Why an order failed validation.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RejectReason {
    /// Resulting position outside `[-max, max]`, or not representable.
    #[error("resulting position exceeds limit")]
    PositionLimit,
    #[error("price below minimum")]
    PriceBelowMin,
    #[error("price above maximum")]
    PriceAboveMax,
}

/// Validates orders against one well-formed [`LimitSet`].
#[derive(Clone, Copy, Debug)]
pub struct RiskValidator {
    limits: LimitSet,
}

impl RiskValidator {
    /// Check `limits` once for the validator's lifetime.
    pub fn new(limits: LimitSet) -> Result<Self> {
        if !limits.is_well_formed() {
            debug!(?limits, "rejected malformed limits");
            return Err(KernelError::invalid(
                "limits",
                format!(
                    "max_position_size {} must be >= 0 and min_price {} <= max_price {}",
                    limits.max_position_size, limits.min_price, limits.max_price
                ),
            ));
        }
        Ok(Self { limits })
    }

    #[inline(always)]
    pub fn limits(&self) -> &LimitSet {
        &self.limits
    }

    /// Check one order, reporting the first failed rule.
    ///
    /// Position is checked before price.
    #[inline]
    pub fn check_order(
        &self,
        order: &OrderRecord,
        positions: &PositionSnapshot,
    ) -> core::result::Result<(), RejectReason> {
        let current = positions.get(SymbolId(order.symbol_id));
        let max = self.limits.max_position_size;
        match current.checked_add(order.quantity) {
            Some(next) if -max <= next && next <= max => {}
            _ => return Err(RejectReason::PositionLimit),
        }

        if order.scaled_price < self.limits.min_price {
            return Err(RejectReason::PriceBelowMin);
        }
        if order.scaled_price > self.limits.max_price {
            return Err(RejectReason::PriceAboveMax);
        }
        Ok(())
    }

    /// Validate a batch, one decision per order.
    pub fn validate_batch(
        &self,
        orders: &[OrderRecord],
        positions: &PositionSnapshot,
    ) -> Result<Vec<bool>> {
        let mut out = try_buffer(orders.len())?;
        out.resize(orders.len(), false);
        self.validate_batch_into(orders, positions, &mut out)?;
        Ok(out)
    }

    /// Validate into a caller buffer of equal length.
    pub fn validate_batch_into(
        &self,
        orders: &[OrderRecord],
        positions: &PositionSnapshot,
        out: &mut [bool],
    ) -> Result<()> {
        if out.len() != orders.len() {
            return Err(KernelError::invalid(
                "out",
                format!("length {} does not match {} orders", out.len(), orders.len()),
            ));
        }

        let mut rejected = 0usize;
        for (order, slot) in orders.iter().zip(out.iter_mut()) {
            *slot = self.check_order(order, positions).is_ok();
            rejected += usize::from(!*slot);
        }

        if rejected > 0 {
            debug!(orders = orders.len(), rejected, "risk batch validated");
        }
        Ok(())
    }
}

/// Validate `orders` against `limits` in one call.
pub fn validate_batch(
    orders: &[OrderRecord],
    positions: &PositionSnapshot,
    limits: &LimitSet,
) -> Result<Vec<bool>> {
    RiskValidator::new(*limits)?.validate_batch(orders, positions)
}
