//! Boundary record layouts shared with the glue layer.
//!
//! All records are fixed-size `#[repr(C)]` plain-old-data and can be
//! viewed directly from caller byte buffers without copying.

#![no_std]

pub mod records;
pub mod view;

pub use records::*;
pub use view::*;
