//! Record definitions.
//!
//! Field order and width are part of the integration contract with the
//! glue layer. Native byte order is used throughout.

use bytemuck::{Pod, Zeroable};
use core::mem::size_of;

use crate::view::ParseError;

/// Book side wire code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    /// Bid side (buyers), sorted descending.
    Bid = 0,
    /// Ask side (sellers), sorted ascending.
    Ask = 1,
}

impl Side {
    /// Get the opposite side.
    #[inline(always)]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    #[inline(always)]
    pub const fn is_bid(self) -> bool {
        matches!(self, Side::Bid)
    }
}

impl TryFrom<u8> for Side {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, ParseError> {
        match value {
            0 => Ok(Side::Bid),
            1 => Ok(Side::Ask),
            _ => Err(ParseError::InvalidCode(value)),
        }
    }
}

/// Level mutation kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BookAction {
    /// Insert the level or overwrite its quantity.
    Upsert = 0,
    /// Delete the level if present.
    Remove = 1,
}

impl TryFrom<u8> for BookAction {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, ParseError> {
        match value {
            0 => Ok(BookAction::Upsert),
            1 => Ok(BookAction::Remove),
            _ => Err(ParseError::InvalidCode(value)),
        }
    }
}

/// Raw tick as delivered by the ingestion layer (24 bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct RawTick {
    pub price: f64,
    pub quantity: f64,
    pub timestamp: f64,
}

const _: () = assert!(size_of::<RawTick>() == 24);

impl RawTick {
    pub const fn new(price: f64, quantity: f64, timestamp: f64) -> Self {
        Self { price, quantity, timestamp }
    }
}

/// Tick after fixed-point scaling (32 bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ScaledTickEvent {
    pub instrument_id: i64,
    pub scaled_price: i64,
    pub scaled_quantity: i64,
    /// Originating timestamp, carried through untouched.
    pub timestamp: f64,
}

const _: () = assert!(size_of::<ScaledTickEvent>() == 32);

/// Candidate order for risk validation (24 bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct OrderRecord {
    pub symbol_id: u32,
    pub _padding: u32,
    /// Signed quantity: positive buys, negative sells.
    pub quantity: i64,
    pub scaled_price: i64,
}

const _: () = assert!(size_of::<OrderRecord>() == 24);

impl OrderRecord {
    pub const fn new(symbol_id: u32, quantity: i64, scaled_price: i64) -> Self {
        Self {
            symbol_id,
            _padding: 0,
            quantity,
            scaled_price,
        }
    }
}

/// One (symbol, signed position) pair of a position snapshot (16 bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct PositionEntry {
    pub symbol_id: u32,
    pub _padding: u32,
    pub position: i64,
}

const _: () = assert!(size_of::<PositionEntry>() == 16);

impl PositionEntry {
    pub const fn new(symbol_id: u32, position: i64) -> Self {
        Self {
            symbol_id,
            _padding: 0,
            position,
        }
    }
}

/// Position and price bounds, all scaled (24 bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct LimitSet {
    pub max_position_size: i64,
    pub min_price: i64,
    pub max_price: i64,
}

const _: () = assert!(size_of::<LimitSet>() == 24);

impl LimitSet {
    pub const fn new(max_position_size: i64, min_price: i64, max_price: i64) -> Self {
        Self {
            max_position_size,
            min_price,
            max_price,
        }
    }

    /// Check the bounds are usable: a non-negative position cap and an
    /// ordered price band.
    #[inline]
    pub const fn is_well_formed(&self) -> bool {
        self.max_position_size >= 0 && self.min_price <= self.max_price
    }
}

/// Level delta for book maintenance (24 bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct DeltaRecord {
    /// 0 = bid, 1 = ask.
    pub side: u8,
    /// 0 = upsert, 1 = remove.
    pub action: u8,
    pub _padding: [u8; 6],
    pub price: i64,
    pub quantity: i64,
}

const _: () = assert!(size_of::<DeltaRecord>() == 24);

impl DeltaRecord {
    pub const fn new(side: Side, action: BookAction, price: i64, quantity: i64) -> Self {
        Self {
            side: side as u8,
            action: action as u8,
            _padding: [0; 6],
            price,
            quantity,
        }
    }

    /// Decode the side and action codes.
    #[inline]
    pub fn decode(&self) -> Result<(Side, BookAction), ParseError> {
        Ok((Side::try_from(self.side)?, BookAction::try_from(self.action)?))
    }
}
