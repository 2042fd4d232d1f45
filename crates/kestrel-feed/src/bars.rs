//! Fixed-count OHLC bars over scaled events.

use kestrel_core::{try_buffer, KernelError, Price, Quantity, Result};
use kestrel_proto::ScaledTickEvent;

/// One OHLC bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bar {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    /// Sum of scaled quantities (saturating).
    pub volume: Quantity,
    pub first_timestamp: f64,
    pub last_timestamp: f64,
    /// Events in this bar. Less than the window only for a trailing bar.
    pub tick_count: usize,
}

impl Bar {
    #[inline]
    fn open(event: &ScaledTickEvent) -> Self {
        let price = Price(event.scaled_price);
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
            volume: Quantity(event.scaled_quantity),
            first_timestamp: event.timestamp,
            last_timestamp: event.timestamp,
            tick_count: 1,
        }
    }

    #[inline]
    fn push(&mut self, event: &ScaledTickEvent) {
        let price = Price(event.scaled_price);
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.volume = self.volume.saturating_add(Quantity(event.scaled_quantity));
        self.last_timestamp = event.timestamp;
        self.tick_count += 1;
    }

    /// Check if the bar covers a full window.
    #[inline(always)]
    pub fn is_complete(&self, window: usize) -> bool {
        self.tick_count == window
    }
}

/// Aggregate consecutive non-overlapping windows of `window` events.
///
/// A trailing partial window yields a partial bar.
pub fn ohlc_bars(events: &[ScaledTickEvent], window: usize) -> Result<Vec<Bar>> {
    if window == 0 {
        return Err(KernelError::invalid("window", "must be at least 1"));
    }

    let mut bars = try_buffer(events.len().div_ceil(window))?;
    for chunk in events.chunks(window) {
        // chunks() never yields an empty slice
        let (first, rest) = match chunk.split_first() {
            Some(split) => split,
            None => continue,
        };
        let mut bar = Bar::open(first);
        for event in rest {
            bar.push(event);
        }
        bars.push(bar);
    }

    Ok(bars)
}
