//! Packed single-order fast path.
//!
//! An order packs into one `u64` (`price:32 | quantity:32`) and its limits
//! into one `u128`, so a check is a handful of shifts and compares with no
//! branches.

const FIELD_BITS: u32 = 32;
const FIELD_MASK: u64 = u32::MAX as u64;

/// Order packed as `price << 32 | quantity`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PackedOrder(pub u64);

impl PackedOrder {
    #[inline(always)]
    pub const fn new(price: u32, quantity: u32) -> Self {
        Self(((price as u64) << FIELD_BITS) | quantity as u64)
    }

    #[inline(always)]
    pub const fn price(self) -> u32 {
        (self.0 >> FIELD_BITS) as u32
    }

    #[inline(always)]
    pub const fn quantity(self) -> u32 {
        (self.0 & FIELD_MASK) as u32
    }
}

/// Inclusive limits packed as
/// `max_price << 96 | min_price << 64 | max_qty << 32 | min_qty`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PackedLimits(pub u128);

impl PackedLimits {
    #[inline(always)]
    pub const fn new(min_qty: u32, max_qty: u32, min_price: u32, max_price: u32) -> Self {
        Self(
            (max_price as u128) << (3 * FIELD_BITS)
                | (min_price as u128) << (2 * FIELD_BITS)
                | (max_qty as u128) << FIELD_BITS
                | min_qty as u128,
        )
    }

    #[inline(always)]
    const fn field(self, index: u32) -> u32 {
        (self.0 >> (index * FIELD_BITS)) as u32
    }

    #[inline(always)]
    pub const fn min_qty(self) -> u32 {
        self.field(0)
    }

    #[inline(always)]
    pub const fn max_qty(self) -> u32 {
        self.field(1)
    }

    #[inline(always)]
    pub const fn min_price(self) -> u32 {
        self.field(2)
    }

    #[inline(always)]
    pub const fn max_price(self) -> u32 {
        self.field(3)
    }

    /// Check quantity and price against their inclusive bands.
    #[inline(always)]
    pub fn admits(self, order: PackedOrder) -> bool {
        let qty = order.quantity();
        let price = order.price();
        let ok = (qty >= self.min_qty()) as u8
            & (qty <= self.max_qty()) as u8
            & (price >= self.min_price()) as u8
            & (price <= self.max_price()) as u8;
        ok == 1
    }
}

/// Check that `position + order_qty` stays within `[-max_position, max_position]`.
///
/// Overflow and a negative `max_position` both fail.
#[inline]
pub fn position_within_limit(position: i64, order_qty: i64, max_position: i64) -> bool {
    match position.checked_add(order_qty) {
        Some(next) => max_position >= 0 && -max_position <= next && next <= max_position,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::positions::PositionSnapshot;
    use crate::validator::validate_batch;
    use kestrel_proto::{LimitSet, OrderRecord};
    use proptest::prelude::*;

    #[test]
    fn test_field_layout() {
        let order = PackedOrder::new(0xDEAD_BEEF, 7);
        assert_eq!(order.0, 0xDEAD_BEEF_0000_0007);
        assert_eq!((order.price(), order.quantity()), (0xDEAD_BEEF, 7));

        let limits = PackedLimits::new(1, 2, 3, u32::MAX);
        assert_eq!(limits.min_qty(), 1);
        assert_eq!(limits.max_qty(), 2);
        assert_eq!(limits.min_price(), 3);
        assert_eq!(limits.max_price(), u32::MAX);
    }

    #[test]
    fn test_admits_inclusive_bounds() {
        let limits = PackedLimits::new(1, 10_000, 200, 50_000);
        assert!(limits.admits(PackedOrder::new(200, 1)));
        assert!(limits.admits(PackedOrder::new(50_000, 10_000)));
        assert!(!limits.admits(PackedOrder::new(199, 5)));
        assert!(!limits.admits(PackedOrder::new(50_001, 5)));
        assert!(!limits.admits(PackedOrder::new(300, 0)));
        assert!(!limits.admits(PackedOrder::new(300, 10_001)));
    }

    #[test]
    fn test_position_within_limit() {
        assert!(position_within_limit(5, 5, 10));
        assert!(!position_within_limit(5, 6, 10));
        assert!(position_within_limit(-5, -5, 10));
        assert!(!position_within_limit(i64::MAX, 1, i64::MAX));
        assert!(!position_within_limit(0, 0, -1));
    }

    proptest! {
        #[test]
        fn prop_packed_agrees_with_validator(
            price in 0u32..2_000,
            qty in 0u32..2_000,
            max_position in 0u32..1_500,
            min_price in 0u32..1_000,
            band in 0u32..1_000,
        ) {
            let max_price = min_price + band;
            let packed = PackedLimits::new(0, max_position, min_price, max_price)
                .admits(PackedOrder::new(price, qty));

            let limits = LimitSet::new(max_position.into(), min_price.into(), max_price.into());
            let order = OrderRecord::new(1, qty.into(), price.into());
            let unpacked = validate_batch(&[order], &PositionSnapshot::new(), &limits).unwrap();

            prop_assert_eq!(packed, unpacked[0]);
            prop_assert_eq!(
                position_within_limit(0, qty.into(), max_position.into()),
                qty <= max_position
            );
        }
    }
}
