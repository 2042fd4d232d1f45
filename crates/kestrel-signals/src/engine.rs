//! Configured indicator parameters.

use kestrel_core::{KernelConfig, Result};
use tracing::debug;

use crate::ema::{ema_batched, Ema};
use crate::rsi::{rsi, Rsi};

/// EMA smoothing factor and RSI period, validated once.
///
/// Holds pristine streaming states that are cloned on demand.
#[derive(Clone, Debug)]
pub struct IndicatorEngine {
    ema: Ema,
    rsi: Rsi,
}

impl IndicatorEngine {
    pub fn new(alpha: f64, period: usize) -> Result<Self> {
        Ok(Self {
            ema: Ema::new(alpha)?,
            rsi: Rsi::new(period)?,
        })
    }

    pub fn from_config(config: &KernelConfig) -> Result<Self> {
        let engine = Self::new(config.signals.ema_alpha, config.signals.rsi_period)?;
        debug!(alpha = engine.alpha(), period = engine.period(), "indicator engine configured");
        Ok(engine)
    }

    #[inline(always)]
    pub fn alpha(&self) -> f64 {
        self.ema.alpha()
    }

    #[inline(always)]
    pub fn period(&self) -> usize {
        self.rsi.period()
    }

    /// EMA over `prices` (lane-batched).
    pub fn ema(&self, prices: &[f64]) -> Result<Vec<f64>> {
        ema_batched(prices, self.alpha())
    }

    /// Wilder RSI over `prices`.
    pub fn rsi(&self, prices: &[f64]) -> Result<Vec<f64>> {
        rsi(prices, self.period())
    }

    /// Fresh streaming EMA with the configured alpha.
    pub fn ema_state(&self) -> Ema {
        self.ema.clone()
    }

    /// Fresh streaming RSI with the configured period.
    pub fn rsi_state(&self) -> Rsi {
        self.rsi.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_config() {
        let engine = IndicatorEngine::from_config(&KernelConfig::default()).unwrap();
        assert_eq!(engine.alpha(), 0.1);
        assert_eq!(engine.period(), 14);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(IndicatorEngine::new(0.0, 14).is_err());
        assert!(IndicatorEngine::new(0.5, 0).is_err());
    }

    #[test]
    fn test_batch_and_streaming_agree() {
        let engine = IndicatorEngine::new(0.5, 2).unwrap();
        let prices = [1.0, 2.0, 1.0, 2.0, 1.0];

        assert_eq!(engine.ema(&[10.0, 20.0, 30.0]).unwrap(), vec![10.0, 15.0, 22.5]);

        let batch = engine.rsi(&prices).unwrap();
        let mut state = engine.rsi_state();
        let streamed: Vec<f64> = prices
            .iter()
            .map(|&p| state.update(p).unwrap_or(f64::NAN))
            .collect();
        for (b, s) in batch.iter().zip(&streamed) {
            assert!((b.is_nan() && s.is_nan()) || b == s);
        }

        let mut ema = engine.ema_state();
        assert_eq!(ema.update(10.0), 10.0);
        assert_eq!(ema.update(20.0), 15.0);
    }
}
