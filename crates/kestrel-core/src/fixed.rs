//! Fixed-point arithmetic for prices and quantities.
//!
//! Values are stored as signed integers scaled by a power of ten, so
//! comparisons and ordering never see IEEE 754 rounding noise.

use core::ops::{Add, Neg, Sub};

use crate::error::{KernelError, Result};

/// Default number of fractional digits.
pub const DEFAULT_DECIMALS: u32 = 8;

/// Largest supported number of fractional digits.
pub const MAX_DECIMALS: u32 = 9;

/// 2^63 as f64; scaled values must stay strictly below it.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Fixed-point price representation.
///
/// Internally stores the price scaled by the scaler's factor.
/// Example: 123.45 with 8 decimals → Price(12_345_000_000)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Price(pub i64);

impl Price {
    /// Zero price.
    pub const ZERO: Self = Self(0);

    /// Maximum price.
    pub const MAX: Self = Self(i64::MAX);

    /// Get raw internal value.
    #[inline(always)]
    pub const fn as_raw(self) -> i64 {
        self.0
    }

    /// Create from raw value (no conversion).
    #[inline(always)]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Check if price is zero.
    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Saturating addition.
    #[inline(always)]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction.
    #[inline(always)]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Add for Price {
    type Output = Self;

    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Sub for Price {
    type Output = Self;

    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

/// Quantity in scaled base units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Quantity(pub i64);

impl Quantity {
    /// Zero quantity.
    pub const ZERO: Self = Self(0);

    /// Maximum quantity.
    pub const MAX: Self = Self(i64::MAX);

    /// Check if quantity is zero.
    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Check if quantity is strictly negative.
    #[inline(always)]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Get raw value.
    #[inline(always)]
    pub const fn as_raw(self) -> i64 {
        self.0
    }

    /// Create from raw value.
    #[inline(always)]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Saturating addition.
    #[inline(always)]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction.
    #[inline(always)]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Checked addition.
    #[inline(always)]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Minimum of two quantities.
    #[inline(always)]
    pub const fn min(self, other: Self) -> Self {
        if self.0 < other.0 { self } else { other }
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Neg for Quantity {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// Converts decimal values to scaled integers and back.
///
/// Scaling rounds half away from zero. For any value with at most
/// `decimals` fractional digits and a scaled magnitude below 2^53,
/// `unscale(scale(x)) == x` exactly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedPointScaler {
    decimals: u32,
    factor: i64,
    factor_f64: f64,
}

impl FixedPointScaler {
    /// Scaler with [`DEFAULT_DECIMALS`] fractional digits.
    pub const fn standard() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
            factor: 100_000_000,
            factor_f64: 100_000_000.0,
        }
    }

    /// Create a scaler with `decimals` fractional digits (`0..=9`).
    pub fn new(decimals: u32) -> Result<Self> {
        if decimals > MAX_DECIMALS {
            return Err(KernelError::invalid(
                "decimals",
                format!("{decimals} exceeds the maximum of {MAX_DECIMALS}"),
            ));
        }
        let factor = 10i64.pow(decimals);
        Ok(Self {
            decimals,
            factor,
            factor_f64: factor as f64,
        })
    }

    /// Number of fractional digits.
    #[inline(always)]
    pub const fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Scale factor (10^decimals).
    #[inline(always)]
    pub const fn factor(&self) -> i64 {
        self.factor
    }

    /// Convert a decimal value to its scaled integer.
    #[inline]
    pub fn scale(&self, value: f64) -> Result<i64> {
        if !value.is_finite() {
            return Err(KernelError::invalid("value", format!("{value} is not finite")));
        }
        let scaled = (value * self.factor_f64).round();
        if !(-I64_BOUND..I64_BOUND).contains(&scaled) {
            return Err(KernelError::invalid(
                "value",
                format!("{value} overflows {} fractional digits", self.decimals),
            ));
        }
        Ok(scaled as i64)
    }

    /// Convert a scaled integer back to a decimal value.
    #[inline(always)]
    pub fn unscale(&self, raw: i64) -> f64 {
        raw as f64 / self.factor_f64
    }

    #[inline]
    pub fn scale_price(&self, value: f64) -> Result<Price> {
        self.scale(value).map(Price)
    }

    #[inline]
    pub fn scale_quantity(&self, value: f64) -> Result<Quantity> {
        self.scale(value).map(Quantity)
    }

    #[inline(always)]
    pub fn price_to_f64(&self, price: Price) -> f64 {
        self.unscale(price.0)
    }

    #[inline(always)]
    pub fn quantity_to_f64(&self, quantity: Quantity) -> f64 {
        self.unscale(quantity.0)
    }
}

impl Default for FixedPointScaler {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scale_known_values() {
        let scaler = FixedPointScaler::standard();
        assert_eq!(scaler.scale(100.0).unwrap(), 10_000_000_000);
        assert_eq!(scaler.scale(0.00000001).unwrap(), 1);
        assert_eq!(scaler.scale(-2.5).unwrap(), -250_000_000);
        assert_eq!(scaler.unscale(12_345_000_000), 123.45);
    }

    #[test]
    fn test_scale_rounds_half_away_from_zero() {
        let scaler = FixedPointScaler::new(0).unwrap();
        assert_eq!(scaler.scale(2.5).unwrap(), 3);
        assert_eq!(scaler.scale(-2.5).unwrap(), -3);
    }

    #[test]
    fn test_scale_rejects_bad_input() {
        let scaler = FixedPointScaler::standard();
        assert!(scaler.scale(f64::NAN).is_err());
        assert!(scaler.scale(f64::INFINITY).is_err());
        assert!(scaler.scale(1e12).is_err());
        assert!(scaler.scale(9e10).is_ok());
    }

    #[test]
    fn test_decimals_bound() {
        assert!(FixedPointScaler::new(9).is_ok());
        assert!(FixedPointScaler::new(10).unwrap_err().is_invalid_parameter());
        assert_eq!(FixedPointScaler::new(8).unwrap(), FixedPointScaler::standard());
    }

    #[test]
    fn test_quantity_ops() {
        let q1 = Quantity(100);
        let q2 = Quantity(50);

        assert_eq!((q1 + q2).0, 150);
        assert_eq!((q1 - q2).0, 50);
        assert_eq!(-q2, Quantity(-50));
        assert_eq!(q1.min(q2), q2);
        assert_eq!(Quantity::MAX.checked_add(q1), None);
    }

    proptest! {
        #[test]
        fn prop_exact_round_trip(raw in -(1i64 << 50)..(1i64 << 50)) {
            let scaler = FixedPointScaler::standard();
            let value = scaler.unscale(raw);
            prop_assert_eq!(scaler.scale(value).unwrap(), raw);
            prop_assert_eq!(scaler.unscale(scaler.scale(value).unwrap()), value);
        }

        #[test]
        fn prop_round_trip_within_precision(value in -1.0e9f64..1.0e9) {
            let scaler = FixedPointScaler::standard();
            let back = scaler.unscale(scaler.scale(value).unwrap());
            let tolerance = 0.5e-8 + value.abs() * 4.0 * f64::EPSILON;
            prop_assert!((back - value).abs() <= tolerance);
        }
    }
}
