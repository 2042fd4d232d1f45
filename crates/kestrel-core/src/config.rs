//! Kernel configuration.
//!
//! Every section is optional in the TOML source; missing keys fall back to
//! the defaults below. Decimal risk limits are converted to a scaled
//! [`LimitSet`] through the configured scaler.

use std::io;
use std::path::{Path, PathBuf};

use kestrel_proto::LimitSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::{KernelError, Result};
use crate::fixed::{FixedPointScaler, DEFAULT_DECIMALS};
use crate::level::DEFAULT_DEPTH;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] KernelError),
}

/// Top-level kernel configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KernelConfig {
    pub scaler: ScalerConfig,
    pub book: BookConfig,
    pub feed: FeedConfig,
    pub signals: SignalConfig,
    pub risk: RiskConfig,
}

/// Fixed-point precision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScalerConfig {
    /// Fractional digits (0..=9).
    pub decimals: u32,
}

impl Default for ScalerConfig {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
        }
    }
}

/// Book sizing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BookConfig {
    /// Maximum levels per side.
    pub capacity_per_side: usize,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            capacity_per_side: DEFAULT_DEPTH,
        }
    }
}

/// Tick ingestion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Ticks converted per chunk.
    pub chunk_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { chunk_size: 64 }
    }
}

/// Indicator parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignalConfig {
    /// EMA smoothing factor in (0, 1].
    pub ema_alpha: f64,
    /// Wilder RSI lookback.
    pub rsi_period: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            ema_alpha: 0.1,
            rsi_period: 14,
        }
    }
}

/// Decimal risk limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RiskConfig {
    pub max_position_size: f64,
    pub min_price: f64,
    pub max_price: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_position_size: 10.0,
            min_price: 0.01,
            max_price: 1_000_000.0,
        }
    }
}

impl KernelConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> core::result::Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        if let Err(err) = config.validate() {
            warn!(error = %err, "rejected kernel config");
            return Err(err.into());
        }
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> core::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        info!(
            path = %path.display(),
            decimals = config.scaler.decimals,
            capacity = config.book.capacity_per_side,
            "loaded kernel config"
        );
        Ok(config)
    }

    /// Check every section against its documented domain.
    pub fn validate(&self) -> Result<()> {
        self.scaler()?;

        if self.book.capacity_per_side == 0 {
            return Err(KernelError::invalid("book.capacity_per_side", "must be at least 1"));
        }
        if self.feed.chunk_size == 0 {
            return Err(KernelError::invalid("feed.chunk_size", "must be at least 1"));
        }

        let alpha = self.signals.ema_alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(KernelError::invalid(
                "signals.ema_alpha",
                format!("{alpha} is outside (0, 1]"),
            ));
        }
        if self.signals.rsi_period == 0 {
            return Err(KernelError::invalid("signals.rsi_period", "must be at least 1"));
        }

        self.limit_set()?;
        Ok(())
    }

    /// Scaler for the configured precision.
    pub fn scaler(&self) -> Result<FixedPointScaler> {
        FixedPointScaler::new(self.scaler.decimals)
    }

    /// Scaled risk limits.
    pub fn limit_set(&self) -> Result<LimitSet> {
        let scaler = self.scaler()?;
        let limits = LimitSet::new(
            scaler.scale(self.risk.max_position_size)?,
            scaler.scale(self.risk.min_price)?,
            scaler.scale(self.risk.max_price)?,
        );
        if !limits.is_well_formed() {
            return Err(KernelError::invalid(
                "risk",
                "max_position_size must be non-negative and min_price <= max_price",
            ));
        }
        Ok(limits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = KernelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scaler.decimals, 8);
        assert_eq!(config.book.capacity_per_side, DEFAULT_DEPTH);
    }

    #[test]
    fn test_partial_document() {
        let config = KernelConfig::from_toml_str(
            r#"
            [book]
            capacity_per_side = 64

            [signals]
            rsi_period = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.book.capacity_per_side, 64);
        assert_eq!(config.signals.rsi_period, 2);
        assert_eq!(config.signals.ema_alpha, 0.1);
        assert_eq!(config.feed.chunk_size, 64);
    }

    #[test]
    fn test_limit_set_is_scaled() {
        let config = KernelConfig::default();
        let limits = config.limit_set().unwrap();
        assert_eq!(limits.max_position_size, 1_000_000_000);
        assert_eq!(limits.min_price, 1_000_000);
        assert_eq!(limits.max_price, 100_000_000_000_000);
    }

    #[test]
    fn test_rejects_bad_alpha() {
        let err = KernelConfig::from_toml_str("[signals]\nema_alpha = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(KernelError::InvalidParameter { name: "signals.ema_alpha", .. })));
    }

    #[test]
    fn test_rejects_inverted_price_band() {
        let err = KernelConfig::from_toml_str("[risk]\nmin_price = 10.0\nmax_price = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = KernelConfig::from_toml_str("[book]\ndepth = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = KernelConfig::from_file("/nonexistent/kestrel.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
