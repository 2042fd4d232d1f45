//! Zero-copy record views.
//!
//! Uses bytemuck for safe transmutation between caller byte buffers and
//! record slices. Nothing is copied and nothing is retained.

use bytemuck::{PodCastError, Pod};
use core::fmt;
use core::mem::size_of;

use crate::records::*;

/// View error types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Buffer doesn't have enough bytes for one record.
    BufferTooSmall,
    /// Buffer is not aligned for the record type.
    MisalignedBuffer,
    /// Buffer length is not a whole number of records.
    TrailingBytes,
    /// Side or action code outside the wire enumeration.
    InvalidCode(u8),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::BufferTooSmall => f.write_str("buffer too small for record"),
            ParseError::MisalignedBuffer => f.write_str("buffer misaligned for record"),
            ParseError::TrailingBytes => f.write_str("buffer length is not a whole number of records"),
            ParseError::InvalidCode(code) => write!(f, "invalid wire code {code}"),
        }
    }
}

impl From<PodCastError> for ParseError {
    fn from(err: PodCastError) -> Self {
        match err {
            PodCastError::TargetAlignmentGreaterAndInputNotAligned => ParseError::MisalignedBuffer,
            PodCastError::OutputSliceWouldHaveSlop => ParseError::TrailingBytes,
            PodCastError::SizeMismatch | PodCastError::AlignmentMismatch => ParseError::BufferTooSmall,
        }
    }
}

/// Zero-copy views over caller buffers.
pub struct RecordView;

impl RecordView {
    /// View a buffer as a slice of `T`.
    #[inline(always)]
    pub fn slice<T: Pod>(buffer: &[u8]) -> Result<&[T], ParseError> {
        bytemuck::try_cast_slice(buffer).map_err(ParseError::from)
    }

    /// View a buffer as exactly one `T`.
    #[inline(always)]
    pub fn single<T: Pod>(buffer: &[u8]) -> Result<&T, ParseError> {
        if buffer.len() < size_of::<T>() {
            return Err(ParseError::BufferTooSmall);
        }
        if buffer.len() > size_of::<T>() {
            return Err(ParseError::TrailingBytes);
        }
        bytemuck::try_from_bytes(buffer).map_err(ParseError::from)
    }

    #[inline(always)]
    pub fn ticks(buffer: &[u8]) -> Result<&[RawTick], ParseError> {
        Self::slice(buffer)
    }

    #[inline(always)]
    pub fn orders(buffer: &[u8]) -> Result<&[OrderRecord], ParseError> {
        Self::slice(buffer)
    }

    #[inline(always)]
    pub fn positions(buffer: &[u8]) -> Result<&[PositionEntry], ParseError> {
        Self::slice(buffer)
    }

    #[inline(always)]
    pub fn deltas(buffer: &[u8]) -> Result<&[DeltaRecord], ParseError> {
        Self::slice(buffer)
    }

    #[inline(always)]
    pub fn limits(buffer: &[u8]) -> Result<&LimitSet, ParseError> {
        Self::single(buffer)
    }

    /// Byte view of produced events, for handing back to the glue layer.
    #[inline(always)]
    pub fn event_bytes(events: &[ScaledTickEvent]) -> &[u8] {
        bytemuck::cast_slice(events)
    }
}
