//! Parametric portfolio risk.
//!
//! `variance = sum_i sum_j w_i * w_j * sigma_i * sigma_j * rho_ij` over
//! position weights `w`, volatilities `sigma` and a row-major correlation
//! matrix `rho`. Negative variances from non positive-semidefinite inputs
//! clamp to zero.

use kestrel_core::{KernelError, Result};

fn check_finite(name: &'static str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(KernelError::invalid(name, format!("element {idx} is not finite"))),
        None => Ok(()),
    }
}

/// Portfolio standard deviation, `sqrt(max(variance, 0))`.
pub fn portfolio_variance(positions: &[f64], correlations: &[f64], volatilities: &[f64]) -> Result<f64> {
    let n = positions.len();
    if volatilities.len() != n {
        return Err(KernelError::invalid(
            "volatilities",
            format!("{} volatilities for {n} positions", volatilities.len()),
        ));
    }
    if n.checked_mul(n) != Some(correlations.len()) {
        return Err(KernelError::invalid(
            "correlations",
            format!("{} entries is not a {n}x{n} matrix", correlations.len()),
        ));
    }
    check_finite("positions", positions)?;
    check_finite("volatilities", volatilities)?;
    check_finite("correlations", correlations)?;

    if n == 0 {
        return Ok(0.0);
    }

    let mut variance = 0.0;
    for (i, row) in correlations.chunks_exact(n).enumerate() {
        let exposure_i = positions[i] * volatilities[i];
        let row_sum: f64 = row
            .iter()
            .zip(positions.iter().zip(volatilities))
            .map(|(rho, (w, sigma))| rho * w * sigma)
            .sum();
        variance += exposure_i * row_sum;
    }

    Ok(variance.max(0.0).sqrt())
}

/// Parametric value-at-risk: `z_score * portfolio_variance`.
pub fn parametric_var(
    positions: &[f64],
    correlations: &[f64],
    volatilities: &[f64],
    z_score: f64,
) -> Result<f64> {
    if !(z_score.is_finite() && z_score >= 0.0) {
        return Err(KernelError::invalid("z_score", format!("{z_score} must be finite and non-negative")));
    }
    Ok(z_score * portfolio_variance(positions, correlations, volatilities)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_asset() {
        let sigma = portfolio_variance(&[2.0], &[1.0], &[0.3]).unwrap();
        assert!((sigma - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_two_assets_uncorrelated() {
        let sigma = portfolio_variance(&[3.0, 4.0], &[1.0, 0.0, 0.0, 1.0], &[1.0, 1.0]).unwrap();
        assert!((sigma - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_hedge_is_zero() {
        let sigma = portfolio_variance(&[1.0, -1.0], &[1.0, 1.0, 1.0, 1.0], &[0.2, 0.2]).unwrap();
        assert!(sigma.abs() < 1e-12);
    }

    #[test]
    fn test_negative_variance_clamps() {
        // Correlation -2 is not a valid matrix; variance would be negative
        let sigma = portfolio_variance(&[1.0, 1.0], &[1.0, -2.0, -2.0, 1.0], &[1.0, 1.0]).unwrap();
        assert_eq!(sigma, 0.0);
    }

    #[test]
    fn test_shape_errors() {
        assert!(portfolio_variance(&[1.0, 2.0], &[1.0], &[1.0, 1.0]).is_err());
        assert!(portfolio_variance(&[1.0], &[1.0], &[1.0, 1.0]).is_err());
        assert!(portfolio_variance(&[f64::NAN], &[1.0], &[1.0]).is_err());
        assert_eq!(portfolio_variance(&[], &[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_parametric_var() {
        let var = parametric_var(&[2.0], &[1.0], &[0.5], 1.65).unwrap();
        assert!((var - 1.65).abs() < 1e-12);
        assert!(parametric_var(&[2.0], &[1.0], &[0.5], -1.0).is_err());
        assert!(parametric_var(&[2.0], &[1.0], &[0.5], f64::INFINITY).is_err());
    }
}
