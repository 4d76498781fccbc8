// src/models/gbm.rs
//! Exact terminal-price sampling for geometric Brownian motion
//!
//! Under the risk-neutral measure the GBM SDE `dS = rS dt + σS dW` has the
//! closed-form solution
//! ```text
//! S_T = S_0 * exp((r - σ²/2)T + σ√T * Z),   Z ~ N(0,1)
//! ```
//! so a single draw per path is enough; no time stepping is involved.

use super::params::{total_variance, validate_spot_model};
use crate::error::{validation::validate_paths, PricingError, PricingResult};
use crate::math_utils::norm_pdf;
use crate::rng;
use ndarray::Array1;
use rand::Rng;
use tracing::debug;

/// Samples at or above this size are mapped on the rayon pool.
pub const PARALLEL_THRESHOLD: usize = 16_384;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gbm {
    pub s0: f64,
    pub r: f64,
    pub sigma: f64,
}

impl Gbm {
    pub fn new(s0: f64, r: f64, sigma: f64) -> PricingResult<Self> {
        validate_spot_model(s0, r, sigma, 0.0)?;
        Ok(Gbm { s0, r, sigma })
    }

    /// S_T for one normal draw. `t` is assumed already validated.
    pub fn exact_terminal(&self, t: f64, normal_draw: f64) -> f64 {
        if t == 0.0 {
            return self.s0;
        }
        if self.sigma == 0.0 {
            return self.s0 * (self.r * t).exp();
        }
        let variance = self.sigma * self.sigma * t;
        self.s0 * (self.r * t - 0.5 * variance + self.sigma * t.sqrt() * normal_draw).exp()
    }

    /// Lognormal density of S_T at `s`, for overlaying on a sample histogram
    ///
    /// # Formula
    /// ```text
    /// f(s) = φ(x) / (s σ√T),   x = [ln(s/S_0) - (r - σ²/2)T] / (σ√T)
    /// ```
    ///
    /// `None` when σ√T = 0: S_T is then a point mass with no density.
    pub fn terminal_density(&self, t: f64, s: f64) -> Option<f64> {
        let vol = self.sigma * t.sqrt();
        if vol == 0.0 {
            return None;
        }
        if s <= 0.0 {
            return Some(0.0);
        }
        let drift = self.r * t - 0.5 * self.sigma * self.sigma * t;
        let x = ((s / self.s0).ln() - drift) / vol;
        Some(norm_pdf(x) / (s * vol))
    }

    /// Map a whole normal sample to terminal prices, preserving order.
    pub fn terminal_prices(&self, t: f64, z: &Array1<f64>) -> PricingResult<Array1<f64>> {
        validate_spot_model(self.s0, self.r, self.sigma, t)?;
        let n = z.len();

        if t == 0.0 {
            debug!(n, "expiry is now, terminal prices collapse to spot");
            return Ok(Array1::from_elem(n, self.s0));
        }

        if self.sigma == 0.0 {
            let deterministic = self.s0 * (self.r * t).exp();
            if !deterministic.is_finite() {
                return Err(PricingError::overflow(
                    "GBM terminal price",
                    format!("S0*exp(rT) = {} for r={}, T={}", deterministic, self.r, t),
                ));
            }
            debug!(n, deterministic, "zero volatility, terminal prices are deterministic");
            return Ok(Array1::from_elem(n, deterministic));
        }

        let variance = total_variance(self.sigma, t)?;
        let drift = self.r * t - 0.5 * variance;
        if !drift.is_finite() {
            return Err(PricingError::overflow(
                "GBM terminal price",
                format!("drift (r - σ²/2)T = {} for r={}, T={}", drift, self.r, t),
            ));
        }
        let vol = self.sigma * t.sqrt();
        let s0 = self.s0;
        let step = move |zi: f64| s0 * (drift + vol * zi).exp();

        let prices = if n >= PARALLEL_THRESHOLD {
            let mut out = z.to_owned();
            out.par_mapv_inplace(step);
            out
        } else {
            z.mapv(step)
        };

        if let Some(bad) = prices.iter().position(|s| !s.is_finite()) {
            return Err(PricingError::overflow(
                "GBM terminal price",
                format!(
                    "draw {} (z = {}) gave S_T = {} with σ²T = {}",
                    bad,
                    z[bad],
                    prices[bad],
                    variance
                ),
            ));
        }

        Ok(prices)
    }
}

/// Terminal prices for a caller-supplied standard normal sample.
pub fn terminal_prices_from_normals(
    s0: f64,
    r: f64,
    sigma: f64,
    t: f64,
    z: &Array1<f64>,
) -> PricingResult<Array1<f64>> {
    Gbm::new(s0, r, sigma)?.terminal_prices(t, z)
}

/// Draw `n` fresh normals from `rng` and map them to terminal prices.
///
/// # Errors
///
/// `InvalidParameter` for `s0 <= 0`, negative `sigma`/`t`, non-finite inputs
/// or `n == 0`; `NumericalOverflow` if any S_T is not finite.
pub fn simulate_terminal_prices<R: Rng + ?Sized>(
    s0: f64,
    r: f64,
    sigma: f64,
    t: f64,
    n: usize,
    rng: &mut R,
) -> PricingResult<Array1<f64>> {
    validate_spot_model(s0, r, sigma, t)?;
    validate_paths(n)?;
    let z = rng::standard_normal_sample(n, rng);
    Gbm { s0, r, sigma }.terminal_prices(t, &z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::params::ModelParams;
    use crate::rng::seed_rng_from_u64;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_expiry_returns_spot_exactly() {
        let z = Array1::from(vec![-3.0, -0.5, 0.0, 1.2, 8.0]);
        let prices = terminal_prices_from_normals(100.0, 0.03, 0.4, 0.0, &z).unwrap();
        assert!(prices.iter().all(|&s| s == 100.0));
    }

    #[test]
    fn test_zero_vol_is_deterministic() {
        let z = Array1::from(vec![-2.0, 0.0, 2.0]);
        let prices = terminal_prices_from_normals(100.0, 0.05, 0.0, 2.0, &z).unwrap();
        let expected = 100.0 * (0.1f64).exp();
        assert!(prices.iter().all(|&s| s == expected));
    }

    #[test]
    fn test_exact_formula_elementwise() {
        let gbm = Gbm::new(100.0, 0.03, 0.4).unwrap();
        let z = Array1::from(vec![-1.0, 0.0, 1.0]);
        let prices = gbm.terminal_prices(0.25, &z).unwrap();
        for (i, &zi) in z.iter().enumerate() {
            let expected = 100.0 * ((0.03 - 0.08) * 0.25 + 0.2 * zi).exp();
            assert_relative_eq!(prices[i], expected, epsilon = 1e-12);
            assert_eq!(prices[i], gbm.exact_terminal(0.25, zi));
        }
    }

    #[test]
    fn test_parallel_map_matches_sequential() {
        let mut rng = seed_rng_from_u64(3);
        let z = rng::standard_normal_sample(PARALLEL_THRESHOLD + 10, &mut rng);
        let gbm = Gbm::new(50.0, 0.01, 0.3).unwrap();
        let parallel = gbm.terminal_prices(1.5, &z).unwrap();
        let sequential = z.mapv(|zi| gbm.exact_terminal(1.5, zi));
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_martingale_mean() {
        let mut rng = seed_rng_from_u64(11);
        let prices = simulate_terminal_prices(100.0, 0.05, 0.2, 1.0, 200_000, &mut rng).unwrap();
        let discounted_mean = prices.mean().unwrap() * (-0.05f64).exp();
        assert!(
            (discounted_mean - 100.0).abs() < 0.3,
            "discounted mean {} should be close to spot",
            discounted_mean
        );
    }

    #[test]
    fn test_terminal_density_integrates_to_one_with_forward_mean() {
        let params = ModelParams::default();
        let gbm = Gbm::new(params.s0, params.r, params.sigma).unwrap();

        let (lo, hi, steps) = (1e-3, 600.0, 600_000);
        let h = (hi - lo) / steps as f64;
        let (mut mass, mut mean) = (0.0, 0.0);
        for i in 0..=steps {
            let s = lo + i as f64 * h;
            let w = if i == 0 || i == steps { 0.5 * h } else { h };
            let f = gbm.terminal_density(params.t, s).unwrap();
            mass += w * f;
            mean += w * s * f;
        }

        assert_relative_eq!(mass, 1.0, epsilon = 1e-6);
        assert_relative_eq!(mean, params.forward(), epsilon = 1e-6);
    }

    #[test]
    fn test_terminal_density_degenerate_and_out_of_support() {
        let gbm = Gbm::new(100.0, 0.03, 0.4).unwrap();
        assert_eq!(gbm.terminal_density(0.0, 100.0), None);
        assert_eq!(Gbm::new(100.0, 0.03, 0.0).unwrap().terminal_density(1.0, 100.0), None);
        assert_eq!(gbm.terminal_density(1.0, 0.0), Some(0.0));
    }

    #[test]
    fn test_overflow_is_signalled() {
        let z = Array1::from(vec![0.0, 40.0]);
        let result = terminal_prices_from_normals(100.0, 0.0, 30.0, 1.0, &z);
        assert!(matches!(result, Err(PricingError::NumericalOverflow { .. })));
    }

    #[test]
    fn test_overflowing_total_variance_is_signalled() {
        let mut rng = seed_rng_from_u64(1);
        assert!(matches!(
            simulate_terminal_prices(100.0, 0.03, 1e200, 1.0, 100, &mut rng),
            Err(PricingError::NumericalOverflow { .. })
        ));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mut rng = seed_rng_from_u64(1);
        assert!(matches!(
            simulate_terminal_prices(-1.0, 0.0, 0.2, 1.0, 10, &mut rng),
            Err(PricingError::InvalidParameter { .. })
        ));
        assert!(matches!(
            simulate_terminal_prices(100.0, 0.0, 0.2, -1.0, 10, &mut rng),
            Err(PricingError::InvalidParameter { .. })
        ));
        assert!(matches!(
            simulate_terminal_prices(100.0, 0.0, 0.2, 1.0, 0, &mut rng),
            Err(PricingError::InvalidParameter { .. })
        ));
    }
}
