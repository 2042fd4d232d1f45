//! Price-level book for a single instrument.
//!
//! Each side is a bounded sorted level array (see [`crate::level`]). The
//! book is mutated only through [`PriceLevelBook::apply_delta`]; every
//! successful mutation bumps the sequence by one and publishes a fresh
//! top-of-book snapshot for concurrent readers.

use std::sync::Arc;

use kestrel_proto::DeltaRecord;
use tracing::{debug, warn};

use crate::config::KernelConfig;
use crate::error::{KernelError, Result};
use crate::fixed::{FixedPointScaler, Price, Quantity};
use crate::level::{LevelSide, PriceLevel, DEFAULT_DEPTH};
use crate::snapshot::{SnapshotCell, TopOfBook, TopOfBookReader};
use crate::types::{BookAction, InstrumentId, Side};

/// Outcome of a book mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateResult {
    /// A level was inserted, updated or removed.
    pub book_changed: bool,
    /// The mutation touched the best level of its side.
    pub top_changed: bool,
}

impl UpdateResult {
    /// Nothing changed.
    pub const UNCHANGED: Self = Self {
        book_changed: false,
        top_changed: false,
    };
}

/// The complete price-level book for a single instrument.
///
/// `N` is the per-side storage bound; the configured capacity may be lower.
pub struct PriceLevelBook<const N: usize = DEFAULT_DEPTH> {
    /// Bid side (buyers), descending.
    bids: LevelSide<N>,
    /// Ask side (sellers), ascending.
    asks: LevelSide<N>,
    /// Incremented once per successful mutation.
    sequence: u64,
    instrument: InstrumentId,
    scaler: FixedPointScaler,
    published: Arc<SnapshotCell>,
}

impl<const N: usize> PriceLevelBook<N> {
    /// Create an empty book with full capacity and the standard scaler.
    pub fn new(instrument: InstrumentId) -> Self {
        Self::build(instrument, N, FixedPointScaler::standard())
    }

    /// Create an empty book with `capacity` levels per side.
    ///
    /// `capacity` must be in `1..=N`.
    pub fn with_capacity(
        instrument: InstrumentId,
        capacity: usize,
        scaler: FixedPointScaler,
    ) -> Result<Self> {
        if capacity == 0 || capacity > N {
            return Err(KernelError::invalid(
                "capacity",
                format!("{capacity} is outside 1..={N}"),
            ));
        }
        Ok(Self::build(instrument, capacity, scaler))
    }

    /// Create a book sized and scaled from configuration.
    pub fn from_config(instrument: InstrumentId, config: &KernelConfig) -> Result<Self> {
        Self::with_capacity(instrument, config.book.capacity_per_side, config.scaler()?)
    }

    fn build(instrument: InstrumentId, capacity: usize, scaler: FixedPointScaler) -> Self {
        Self {
            bids: LevelSide::new(Side::Bid, capacity),
            asks: LevelSide::new(Side::Ask, capacity),
            sequence: 0,
            instrument,
            scaler,
            published: Arc::new(SnapshotCell::new()),
        }
    }

    /// Apply one level delta.
    ///
    /// `Remove`, or `Upsert` with zero quantity, deletes the level; deleting
    /// an absent level (any price) is a no-op. Inserts need a positive price
    /// and a non-negative quantity. Inserting into a full side fails with
    /// [`KernelError::CapacityExceeded`] and leaves the book untouched.
    #[inline]
    pub fn apply_delta(
        &mut self,
        side: Side,
        price: Price,
        quantity: Quantity,
        action: BookAction,
    ) -> Result<UpdateResult> {
        let removes = action == BookAction::Remove || quantity.is_zero();
        if !removes {
            // Only inserts are validated
            if price.0 <= 0 {
                debug!(instrument = self.instrument.0, price = price.0, "rejected non-positive price");
                return Err(KernelError::invalid("price", format!("{} is not positive", price.0)));
            }
            if quantity.is_negative() {
                debug!(instrument = self.instrument.0, quantity = quantity.0, "rejected negative quantity");
                return Err(KernelError::invalid(
                    "quantity",
                    format!("{} is negative", quantity.0),
                ));
            }
        }

        let book_side = self.side_mut(side);

        let touched = if removes {
            match book_side.remove(price) {
                Some(idx) => idx,
                None => return Ok(UpdateResult::UNCHANGED),
            }
        } else {
            match book_side.upsert(price, quantity) {
                Some(outcome) => outcome.index(),
                None => {
                    let capacity = book_side.capacity();
                    warn!(
                        instrument = self.instrument.0,
                        ?side,
                        capacity,
                        price = price.0,
                        "book side full, insert rejected"
                    );
                    return Err(KernelError::CapacityExceeded { side, capacity });
                }
            }
        };

        self.sequence += 1;
        self.publish();

        Ok(UpdateResult {
            book_changed: true,
            top_changed: touched == 0,
        })
    }

    /// Apply a delta given in decimal units, scaled with the book's scaler.
    pub fn apply_decimal_delta(
        &mut self,
        side: Side,
        price: f64,
        quantity: f64,
        action: BookAction,
    ) -> Result<UpdateResult> {
        let price = self.scaler.scale_price(price)?;
        let quantity = self.scaler.scale_quantity(quantity)?;
        self.apply_delta(side, price, quantity, action)
    }

    /// Apply a wire-level delta record.
    pub fn apply_record(&mut self, record: &DeltaRecord) -> Result<UpdateResult> {
        let (side, action) = record.decode()?;
        self.apply_delta(side, Price(record.price), Quantity(record.quantity), action)
    }

    #[inline]
    fn publish(&self) {
        self.published.publish(self.top_of_book());
    }

    /// Best bid and best ask, O(1).
    #[inline(always)]
    pub fn best_bid_ask(&self) -> (Option<Price>, Option<Price>) {
        (self.bids.best_price(), self.asks.best_price())
    }

    /// Get best bid price.
    #[inline(always)]
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Get best ask price.
    #[inline(always)]
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Current top of book with sequence.
    #[inline(always)]
    pub fn top_of_book(&self) -> TopOfBook {
        TopOfBook {
            best_bid: self.best_bid(),
            best_ask: self.best_ask(),
            sequence: self.sequence,
        }
    }

    /// Lock-free reader for other threads.
    pub fn reader(&self) -> TopOfBookReader {
        TopOfBookReader::new(Arc::clone(&self.published))
    }

    /// Get the spread (best ask - best bid).
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask.0 > bid.0 => Some(Price(ask.0 - bid.0)),
            _ => None,
        }
    }

    /// Get midpoint price, floored. Falls back to the one side present.
    pub fn midpoint(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(Price(bid.0 + (ask.0 - bid.0).div_euclid(2))),
            (Some(bid), None) => Some(bid),
            (None, Some(ask)) => Some(ask),
            (None, None) => None,
        }
    }

    /// Levels of one side in priority order.
    #[inline(always)]
    pub fn levels(&self, side: Side) -> &[PriceLevel] {
        self.side(side).as_slice()
    }

    /// Number of levels on one side.
    #[inline(always)]
    pub fn depth(&self, side: Side) -> usize {
        self.side(side).len()
    }

    /// Quantity resting at `price` on one side.
    #[inline]
    pub fn quantity_at(&self, side: Side, price: Price) -> Option<Quantity> {
        self.side(side).quantity_at(price)
    }

    /// Total quantity on one side.
    pub fn total_quantity(&self, side: Side) -> Quantity {
        self.side(side).total_quantity()
    }

    /// Get the current sequence number.
    #[inline(always)]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    #[inline(always)]
    pub fn instrument(&self) -> InstrumentId {
        self.instrument
    }

    /// Configured per-side capacity.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.bids.capacity()
    }

    #[inline(always)]
    pub fn scaler(&self) -> &FixedPointScaler {
        &self.scaler
    }

    /// Check if book is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Get immutable reference to appropriate side.
    #[inline(always)]
    pub fn side(&self, side: Side) -> &LevelSide<N> {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    #[inline(always)]
    fn side_mut(&mut self, side: Side) -> &mut LevelSide<N> {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }
}
