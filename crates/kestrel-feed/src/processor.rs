//! Bulk raw-tick to scaled-event conversion.

use kestrel_core::{try_buffer, FixedPointScaler, InstrumentId, KernelConfig, KernelError, Result};
use kestrel_proto::{RawTick, RecordView, ScaledTickEvent};
use tracing::debug;

/// Default number of ticks converted per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// Converts raw ticks for one instrument into [`ScaledTickEvent`]s.
///
/// Every output element depends only on its own input, so the chunk size
/// changes the traversal and never the result.
#[derive(Clone, Debug)]
pub struct TickBatchProcessor {
    instrument: InstrumentId,
    scaler: FixedPointScaler,
    chunk_size: usize,
}

impl TickBatchProcessor {
    pub fn new(instrument: InstrumentId, scaler: FixedPointScaler) -> Self {
        Self {
            instrument,
            scaler,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the chunk size. Must be at least 1.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(KernelError::invalid("chunk_size", "must be at least 1"));
        }
        self.chunk_size = chunk_size;
        Ok(self)
    }

    pub fn from_config(instrument: InstrumentId, config: &KernelConfig) -> Result<Self> {
        Self::new(instrument, config.scaler()?).with_chunk_size(config.feed.chunk_size)
    }

    #[inline(always)]
    pub fn instrument(&self) -> InstrumentId {
        self.instrument
    }

    #[inline(always)]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[inline(always)]
    pub fn scaler(&self) -> &FixedPointScaler {
        &self.scaler
    }

    /// Convert a single tick. `index` is reported on failure.
    #[inline]
    fn convert(&self, index: usize, tick: &RawTick) -> Result<ScaledTickEvent> {
        let scaled_price = self.scaler.scale(tick.price).map_err(|_| {
            KernelError::invalid("ticks", format!("tick {index}: price {} out of range", tick.price))
        })?;
        let scaled_quantity = self.scaler.scale(tick.quantity).map_err(|_| {
            KernelError::invalid(
                "ticks",
                format!("tick {index}: quantity {} out of range", tick.quantity),
            )
        })?;

        Ok(ScaledTickEvent {
            instrument_id: self.instrument.as_raw(),
            scaled_price,
            scaled_quantity,
            timestamp: tick.timestamp,
        })
    }

    /// Convert a batch of ticks, preserving length and order.
    ///
    /// Fails on the first non-finite or out-of-range value; no events are
    /// returned in that case.
    pub fn process(&self, ticks: &[RawTick]) -> Result<Vec<ScaledTickEvent>> {
        let mut events = try_buffer(ticks.len())?;

        for (chunk_idx, chunk) in ticks.chunks(self.chunk_size).enumerate() {
            let base = chunk_idx * self.chunk_size;
            for (offset, tick) in chunk.iter().enumerate() {
                match self.convert(base + offset, tick) {
                    Ok(event) => events.push(event),
                    Err(err) => {
                        debug!(instrument = self.instrument.0, error = %err, "tick batch rejected");
                        return Err(err);
                    }
                }
            }
        }

        Ok(events)
    }

    /// Convert into a caller-provided buffer of equal length.
    ///
    /// On failure `out` is reset to default events.
    pub fn process_into(&self, ticks: &[RawTick], out: &mut [ScaledTickEvent]) -> Result<()> {
        if out.len() != ticks.len() {
            return Err(KernelError::invalid(
                "out",
                format!("length {} does not match {} ticks", out.len(), ticks.len()),
            ));
        }

        let chunks = ticks.chunks(self.chunk_size).zip(out.chunks_mut(self.chunk_size));
        for (chunk_idx, (input, output)) in chunks.enumerate() {
            let base = chunk_idx * self.chunk_size;
            for (offset, (tick, slot)) in input.iter().zip(output.iter_mut()).enumerate() {
                match self.convert(base + offset, tick) {
                    Ok(event) => *slot = event,
                    Err(err) => {
                        debug!(instrument = self.instrument.0, error = %err, "tick batch rejected");
                        out.fill(ScaledTickEvent::default());
                        return Err(err);
                    }
                }
            }
        }

        Ok(())
    }

    /// View `bytes` as packed [`RawTick`] records and convert them.
    pub fn process_bytes(&self, bytes: &[u8]) -> Result<Vec<ScaledTickEvent>> {
        let ticks = RecordView::ticks(bytes)?;
        self.process(ticks)
    }
}
