//! Sorted price-level storage for one book side.
//!
//! Levels live in a contiguous fixed-capacity array kept sorted by price
//! (bids descending, asks ascending). Lookup is a binary search, insert and
//! delete shift the tail. The best level is always index 0.

use arrayvec::ArrayVec;
use core::cmp::Ordering;

use crate::fixed::{Price, Quantity};
use crate::types::Side;

/// Default per-side capacity.
pub const DEFAULT_DEPTH: usize = 1024;

/// A single aggregated price level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct PriceLevel {
    /// Level price.
    pub price: Price,
    /// Aggregate quantity. Always positive while the level is stored.
    pub quantity: Quantity,
}

impl PriceLevel {
    #[inline(always)]
    pub const fn new(price: Price, quantity: Quantity) -> Self {
        Self { price, quantity }
    }
}

/// Outcome of a side-level upsert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upsert {
    /// Existing level at this index had its quantity overwritten.
    Updated(usize),
    /// New level inserted at this index.
    Inserted(usize),
}

impl Upsert {
    #[inline(always)]
    pub const fn index(self) -> usize {
        match self {
            Upsert::Updated(idx) | Upsert::Inserted(idx) => idx,
        }
    }
}

/// One side of the book (bids or asks).
///
/// `N` is the storage bound; `capacity` is the configured limit and never
/// exceeds `N`.
#[derive(Clone, Debug)]
pub struct LevelSide<const N: usize = DEFAULT_DEPTH> {
    levels: ArrayVec<PriceLevel, N>,
    side: Side,
    capacity: usize,
}

impl<const N: usize> LevelSide<N> {
    /// Create an empty side. `capacity` is clamped to `N`.
    pub fn new(side: Side, capacity: usize) -> Self {
        Self {
            levels: ArrayVec::new(),
            side,
            capacity: capacity.min(N),
        }
    }

    /// Ordering of `level` relative to `price` in this side's sort order.
    #[inline(always)]
    fn order(&self, level: &PriceLevel, price: Price) -> Ordering {
        match self.side {
            // Bids: higher prices come first
            Side::Bid => price.cmp(&level.price),
            // Asks: lower prices come first
            Side::Ask => level.price.cmp(&price),
        }
    }

    /// Binary search for `price`.
    ///
    /// `Ok(idx)` if a level exists at `idx`, `Err(idx)` with the sorted
    /// insertion point otherwise.
    #[inline(always)]
    pub fn locate(&self, price: Price) -> Result<usize, usize> {
        self.levels.binary_search_by(|level| self.order(level, price))
    }

    /// Insert a level or overwrite its quantity.
    ///
    /// Returns `None` if a new level is needed and the side is full; the
    /// side is untouched in that case.
    #[inline]
    pub fn upsert(&mut self, price: Price, quantity: Quantity) -> Option<Upsert> {
        debug_assert!(quantity.0 > 0, "stored levels must have positive quantity");
        match self.locate(price) {
            Ok(idx) => {
                self.levels[idx].quantity = quantity;
                Some(Upsert::Updated(idx))
            }
            Err(idx) => {
                if self.is_full() {
                    return None;
                }
                self.levels.insert(idx, PriceLevel::new(price, quantity));
                Some(Upsert::Inserted(idx))
            }
        }
    }

    /// Remove the level at `price`, returning its former index.
    #[inline]
    pub fn remove(&mut self, price: Price) -> Option<usize> {
        let idx = self.locate(price).ok()?;
        self.levels.remove(idx);
        Some(idx)
    }

    /// Best level (index 0).
    #[inline(always)]
    pub fn best(&self) -> Option<&PriceLevel> {
        self.levels.first()
    }

    /// Best price.
    #[inline(always)]
    pub fn best_price(&self) -> Option<Price> {
        self.levels.first().map(|level| level.price)
    }

    /// Quantity resting at `price`, if the level exists.
    #[inline]
    pub fn quantity_at(&self, price: Price) -> Option<Quantity> {
        self.locate(price).ok().map(|idx| self.levels[idx].quantity)
    }

    /// Levels in priority order.
    #[inline(always)]
    pub fn as_slice(&self) -> &[PriceLevel] {
        &self.levels
    }

    #[inline(always)]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.levels.len() >= self.capacity
    }

    /// Total quantity across all levels (saturating).
    pub fn total_quantity(&self) -> Quantity {
        self.levels
            .iter()
            .fold(Quantity::ZERO, |acc, level| acc.saturating_add(level.quantity))
    }

    /// Check that prices are strictly ordered for this side.
    pub fn is_strictly_ordered(&self) -> bool {
        self.levels.windows(2).all(|pair| match self.side {
            Side::Bid => pair[0].price > pair[1].price,
            Side::Ask => pair[0].price < pair[1].price,
        })
    }
}
