//! Exponential moving average.
//!
//! `ema[t] = alpha * price[t] + (1 - alpha) * ema[t - 1]`, seeded with the
//! first price.
//!
//! The batched form unrolls the recurrence over a block of four prices.
//! With `d = 1 - alpha` and carry `c` (the EMA before the block):
//!
//! ```text
//! out[k] = d^(k+1) * c + sum_{j <= k} alpha * d^(k-j) * p[j]
//! ```
//!
//! which is one multiply-add per column. The last lane becomes the carry
//! for the next block.

use kestrel_core::{try_buffer, KernelError, Result};
use wide::f64x4;

/// Lane width of the batched kernels.
pub const LANES: usize = 4;

/// Validate a smoothing factor.
#[inline]
pub(crate) fn check_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha <= 1.0 {
        Ok(())
    } else {
        Err(KernelError::invalid("alpha", format!("{alpha} is outside (0, 1]")))
    }
}

/// Scalar reference EMA over a full sequence.
pub fn ema(prices: &[f64], alpha: f64) -> Result<Vec<f64>> {
    check_alpha(alpha)?;
    let mut out = try_buffer(prices.len())?;

    let decay = 1.0 - alpha;
    let mut prev = match prices.first() {
        Some(&first) => first,
        None => return Ok(out),
    };
    out.push(prev);

    for &price in &prices[1..] {
        prev = alpha * price + decay * prev;
        out.push(prev);
    }
    Ok(out)
}

/// EMA over a full sequence using the lane-blocked kernel.
pub fn ema_batched(prices: &[f64], alpha: f64) -> Result<Vec<f64>> {
    let mut state = Ema::new(alpha)?;
    let mut out = try_buffer(prices.len())?;
    out.resize(prices.len(), 0.0);
    state.update_batch(prices, &mut out)?;
    Ok(out)
}

/// Streaming EMA state.
#[derive(Clone, Debug)]
pub struct Ema {
    alpha: f64,
    decay: f64,
    value: Option<f64>,
    /// `decay^(k+1)` per lane, applied to the carry.
    carry_weights: f64x4,
    /// Column `j` holds `alpha * decay^(k-j)` for lanes `k >= j`, else 0.
    columns: [f64x4; LANES],
}

impl Ema {
    pub fn new(alpha: f64) -> Result<Self> {
        check_alpha(alpha)?;
        let decay = 1.0 - alpha;

        let mut carry = [0.0; LANES];
        let mut columns = [[0.0; LANES]; LANES];
        for k in 0..LANES {
            carry[k] = decay.powi(k as i32 + 1);
            for (j, column) in columns.iter_mut().enumerate().take(k + 1) {
                column[k] = alpha * decay.powi((k - j) as i32);
            }
        }

        Ok(Self {
            alpha,
            decay,
            value: None,
            carry_weights: f64x4::new(carry),
            columns: columns.map(f64x4::new),
        })
    }

    #[inline(always)]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Current EMA, `None` before the first sample.
    #[inline(always)]
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Forget all samples.
    pub fn reset(&mut self) {
        self.value = None;
    }

    /// Feed one price and return the updated EMA.
    #[inline]
    pub fn update(&mut self, price: f64) -> f64 {
        let next = match self.value {
            Some(prev) => self.alpha * price + self.decay * prev,
            None => price,
        };
        self.value = Some(next);
        next
    }

    /// Feed a block of prices, writing the EMA after each into `out`.
    ///
    /// Equivalent to calling [`Ema::update`] for each price.
    pub fn update_batch(&mut self, prices: &[f64], out: &mut [f64]) -> Result<()> {
        if out.len() != prices.len() {
            return Err(KernelError::invalid(
                "out",
                format!("length {} does not match {} prices", out.len(), prices.len()),
            ));
        }

        let mut start = 0;
        let mut carry = match self.value {
            Some(value) => value,
            None => match prices.first() {
                Some(&first) => {
                    out[0] = first;
                    start = 1;
                    first
                }
                None => return Ok(()),
            },
        };

        let body = &prices[start..];
        let blocks = body.len() / LANES;
        for (block, slot) in body
            .chunks_exact(LANES)
            .zip(out[start..].chunks_exact_mut(LANES))
        {
            let mut acc = self.carry_weights * f64x4::splat(carry);
            for (column, &price) in self.columns.iter().zip(block) {
                acc += *column * f64x4::splat(price);
            }
            let lanes = acc.to_array();
            slot.copy_from_slice(&lanes);
            carry = lanes[LANES - 1];
        }

        let tail = start + blocks * LANES;
        for (price, slot) in prices[tail..].iter().zip(&mut out[tail..]) {
            carry = self.alpha * price + self.decay * carry;
            *slot = carry;
        }

        self.value = Some(carry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            let tol = 1e-9 * e.abs().max(1.0);
            assert!((a - e).abs() <= tol, "index {i}: {a} != {e}");
        }
    }

    #[test]
    fn test_ema_hand_example() {
        assert_eq!(ema(&[10.0, 20.0, 30.0], 0.5).unwrap(), vec![10.0, 15.0, 22.5]);
        assert_eq!(ema_batched(&[10.0, 20.0, 30.0], 0.5).unwrap(), vec![10.0, 15.0, 22.5]);
    }

    #[test]
    fn test_alpha_domain() {
        assert!(ema(&[1.0], 0.0).is_err());
        assert!(ema(&[1.0], 1.5).is_err());
        assert!(ema(&[1.0], f64::NAN).is_err());
        assert!(Ema::new(-0.1).is_err());
        assert_eq!(ema(&[3.0, 7.0], 1.0).unwrap(), vec![3.0, 7.0]);
    }

    #[test]
    fn test_empty_input() {
        assert!(ema(&[], 0.3).unwrap().is_empty());
        assert!(ema_batched(&[], 0.3).unwrap().is_empty());
    }

    #[test]
    fn test_blocks_carry_previous_value() {
        // A kernel that restarts each lane block from its own first price
        // would report 50.0 at index 4; the true EMA carries the earlier prices.
        let prices = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0];
        let batched = ema_batched(&prices, 0.5).unwrap();
        assert_close(&batched, &ema(&prices, 0.5).unwrap());
        assert!((batched[4] - 50.0).abs() > 1.0);
        assert!((batched[4] - 40.625).abs() < 1e-12);
    }

    #[test]
    fn test_streaming_matches_batch() {
        let prices: Vec<f64> = (0..23).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let mut state = Ema::new(0.2).unwrap();
        let streamed: Vec<f64> = prices.iter().map(|&p| state.update(p)).collect();
        assert_close(&streamed, &ema(&prices, 0.2).unwrap());

        state.reset();
        assert_eq!(state.value(), None);
        assert_eq!(state.update(42.0), 42.0);
    }

    #[test]
    fn test_update_batch_length_mismatch() {
        let mut state = Ema::new(0.5).unwrap();
        let mut out = [0.0; 2];
        assert!(state.update_batch(&[1.0, 2.0, 3.0], &mut out).is_err());
        assert_eq!(state.value(), None);
    }

    proptest! {
        #[test]
        fn prop_batched_matches_scalar(
            prices in prop::collection::vec(1.0f64..10_000.0, 0..200),
            alpha in 0.001f64..=1.0,
        ) {
            let scalar = ema(&prices, alpha).unwrap();
            let batched = ema_batched(&prices, alpha).unwrap();
            prop_assert_eq!(scalar.len(), batched.len());
            for (s, b) in scalar.iter().zip(&batched) {
                prop_assert!((s - b).abs() <= 1e-9 * s.abs().max(1.0));
            }
        }

        #[test]
        fn prop_split_calls_match_single_call(
            prices in prop::collection::vec(1.0f64..10_000.0, 1..120),
            split in 0usize..120,
            alpha in 0.01f64..=1.0,
        ) {
            let split = split.min(prices.len());
            let expected = ema(&prices, alpha).unwrap();

            let mut state = Ema::new(alpha).unwrap();
            let mut out = vec![0.0; prices.len()];
            let (head, tail) = prices.split_at(split);
            let (out_head, out_tail) = out.split_at_mut(split);
            state.update_batch(head, out_head).unwrap();
            state.update_batch(tail, out_tail).unwrap();

            for (e, o) in expected.iter().zip(&out) {
                prop_assert!((e - o).abs() <= 1e-9 * e.abs().max(1.0));
            }
        }
    }
}
