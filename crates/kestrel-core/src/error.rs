//! Kernel error taxonomy.
//!
//! Every kernel operation is all-or-nothing: an `Err` means no state was
//! touched and no partial output was produced.

use std::collections::TryReserveError;

use kestrel_proto::{ParseError, Side};
use thiserror::Error;

/// Errors reported by the kernels.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum KernelError {
    /// A parameter or input value is outside its documented domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A book side is full and cannot take another level.
    #[error("{side:?} side at capacity ({capacity} levels)")]
    CapacityExceeded { side: Side, capacity: usize },

    /// Working buffers for a batch could not be reserved.
    #[error("could not reserve working buffer: {0}")]
    AllocationFailure(#[from] TryReserveError),
}

impl KernelError {
    /// Shorthand for [`KernelError::InvalidParameter`].
    #[inline]
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Check whether this is an invalid-parameter error.
    #[inline]
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}

impl From<ParseError> for KernelError {
    fn from(err: ParseError) -> Self {
        Self::invalid("record", err.to_string())
    }
}

/// Result alias used across the kernels.
pub type Result<T> = core::result::Result<T, KernelError>;

/// Reserve an output buffer of exactly `len` elements, reporting failure
/// instead of aborting.
#[inline]
pub fn try_buffer<T>(len: usize) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KernelError::invalid("alpha", "must lie in (0, 1]");
        assert_eq!(err.to_string(), "invalid parameter `alpha`: must lie in (0, 1]");
        assert!(err.is_invalid_parameter());

        let err = KernelError::CapacityExceeded { side: Side::Bid, capacity: 4 };
        assert_eq!(err.to_string(), "Bid side at capacity (4 levels)");
    }

    #[test]
    fn test_parse_error_maps_to_invalid_parameter() {
        let err: KernelError = ParseError::InvalidCode(9).into();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_try_buffer() {
        let buffer: Vec<u64> = try_buffer(16).unwrap();
        assert!(buffer.capacity() >= 16);
        assert!(buffer.is_empty());

        let huge = try_buffer::<u64>(usize::MAX);
        assert!(matches!(huge, Err(KernelError::AllocationFailure(_))));
    }
}
