//! Wilder relative-strength index.
//!
//! Averages are seeded with the arithmetic mean of the first `period`
//! gains/losses, then smoothed with `avg = ((period - 1) * avg + x) / period`.
//! Output is aligned with the input; the first `period` slots carry `NaN`.

use kestrel_core::{try_buffer, KernelError, Result};
use wide::f64x4;

use crate::ema::LANES;

/// RSI from smoothed averages.
#[inline(always)]
fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

/// Batch RSI over a full sequence.
///
/// The gain/loss split runs in lanes; the smoothing is sequential.
pub fn rsi(prices: &[f64], period: usize) -> Result<Vec<f64>> {
    if prices.is_empty() {
        return Ok(Vec::new());
    }
    if period == 0 || period > prices.len() {
        return Err(KernelError::invalid(
            "period",
            format!("{period} is outside 1..={}", prices.len()),
        ));
    }

    let changes = prices.len() - 1;
    let mut gains: Vec<f64> = try_buffer(changes)?;
    let mut losses: Vec<f64> = try_buffer(changes)?;
    split_changes(prices, &mut gains, &mut losses);

    let mut out = try_buffer(prices.len())?;
    out.resize(prices.len(), f64::NAN);
    if changes < period {
        return Ok(out);
    }

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;
    out[period] = rsi_value(avg_gain, avg_loss);

    let weight = (period - 1) as f64;
    for i in period..changes {
        avg_gain = (weight * avg_gain + gains[i]) / period as f64;
        avg_loss = (weight * avg_loss + losses[i]) / period as f64;
        out[i + 1] = rsi_value(avg_gain, avg_loss);
    }

    Ok(out)
}

/// Split consecutive price changes into gains and losses.
///
/// `gains[i]` and `losses[i]` describe `prices[i + 1] - prices[i]`.
fn split_changes(prices: &[f64], gains: &mut Vec<f64>, losses: &mut Vec<f64>) {
    let zero = f64x4::splat(0.0);
    let prev = &prices[..prices.len() - 1];
    let next = &prices[1..];

    let mut prev_blocks = prev.chunks_exact(LANES);
    let mut next_blocks = next.chunks_exact(LANES);
    for (p, n) in (&mut prev_blocks).zip(&mut next_blocks) {
        let p = f64x4::new([p[0], p[1], p[2], p[3]]);
        let n = f64x4::new([n[0], n[1], n[2], n[3]]);
        let change = n - p;
        gains.extend_from_slice(&change.max(zero).to_array());
        losses.extend_from_slice(&(zero - change).max(zero).to_array());
    }

    for (p, n) in prev_blocks.remainder().iter().zip(next_blocks.remainder()) {
        let change = n - p;
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }
}

/// Streaming Wilder RSI.
#[derive(Clone, Debug)]
pub struct Rsi {
    period: usize,
    prev: Option<f64>,
    /// Changes observed so far, saturating at `period`.
    seen: usize,
    sum_gain: f64,
    sum_loss: f64,
    avg_gain: f64,
    avg_loss: f64,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(KernelError::invalid("period", "must be at least 1"));
        }
        Ok(Self {
            period,
            prev: None,
            seen: 0,
            sum_gain: 0.0,
            sum_loss: 0.0,
            avg_gain: 0.0,
            avg_loss: 0.0,
        })
    }

    #[inline(always)]
    pub fn period(&self) -> usize {
        self.period
    }

    /// Check if the averages are seeded.
    #[inline(always)]
    pub fn is_ready(&self) -> bool {
        self.seen == self.period
    }

    /// Forget all samples.
    pub fn reset(&mut self) {
        *self = Self {
            period: self.period,
            prev: None,
            seen: 0,
            sum_gain: 0.0,
            sum_loss: 0.0,
            avg_gain: 0.0,
            avg_loss: 0.0,
        };
    }

    /// Feed one price. Returns the RSI once `period` changes have been seen.
    pub fn update(&mut self, price: f64) -> Option<f64> {
        let prev = self.prev.replace(price)?;
        let change = price - prev;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if self.is_ready() {
            let weight = (self.period - 1) as f64;
            self.avg_gain = (weight * self.avg_gain + gain) / self.period as f64;
            self.avg_loss = (weight * self.avg_loss + loss) / self.period as f64;
            return Some(rsi_value(self.avg_gain, self.avg_loss));
        }

        self.sum_gain += gain;
        self.sum_loss += loss;
        self.seen += 1;
        if !self.is_ready() {
            return None;
        }

        self.avg_gain = self.sum_gain / self.period as f64;
        self.avg_loss = self.sum_loss / self.period as f64;
        Some(rsi_value(self.avg_gain, self.avg_loss))
    }

    /// Feed a block of prices, writing each RSI (or `NaN`) into `out`.
    pub fn update_batch(&mut self, prices: &[f64], out: &mut [f64]) -> Result<()> {
        if out.len() != prices.len() {
            return Err(KernelError::invalid(
                "out",
                format!("length {} does not match {} prices", out.len(), prices.len()),
            ));
        }
        for (&price, slot) in prices.iter().zip(out.iter_mut()) {
            *slot = self.update(price).unwrap_or(f64::NAN);
        }
        Ok(())
    }
}
