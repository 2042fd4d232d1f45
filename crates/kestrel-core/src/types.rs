//! Identifier types.

pub use kestrel_proto::{BookAction, Side};

/// Symbol identifier used by risk validation.
///
/// Pre-hashed by the caller. Maps "AAPL" → SymbolId(42) at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SymbolId(pub u32);

impl SymbolId {
    /// Invalid/unset symbol.
    pub const INVALID: Self = Self(u32::MAX);
}

/// Instrument identifier carried on scaled events and books.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[repr(transparent)]
pub struct InstrumentId(pub i64);

impl InstrumentId {
    #[inline(always)]
    pub const fn as_raw(self) -> i64 {
        self.0
    }
}
