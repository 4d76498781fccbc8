// src/models/params.rs
use crate::error::{validation::*, PricingError, PricingResult};

/// Black-Scholes-Merton contract and market inputs.
///
/// `sigma == 0` or `t == 0` are valid degenerate inputs; the pricers switch to
/// their deterministic branches instead of dividing by `σ√T`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelParams {
    pub s0: f64,    // Spot price
    pub r: f64,     // Risk-free rate (annualized, continuous)
    pub sigma: f64, // Volatility (annualized)
    pub t: f64,     // Time to expiry in years
    pub k: f64,     // Strike
}

impl ModelParams {
    pub fn new(s0: f64, r: f64, sigma: f64, t: f64, k: f64) -> Self {
        ModelParams { s0, r, sigma, t, k }
    }

    /// Validate every field, spot-model fields first.
    pub fn validate(&self) -> PricingResult<()> {
        validate_spot_model(self.s0, self.r, self.sigma, self.t)?;
        validate_positive("k", self.k)
    }

    /// e^(−rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.r * self.t).exp()
    }

    /// S₀·e^(rT)
    pub fn forward(&self) -> f64 {
        self.s0 * (self.r * self.t).exp()
    }

    /// True when σ√T = 0 and the terminal price is deterministic.
    pub fn is_degenerate(&self) -> bool {
        self.sigma * self.t.sqrt() == 0.0
    }

    /// Lower no-arbitrage bound max(S₀ − K·e^(−rT), 0)
    pub fn intrinsic_forward_value(&self) -> f64 {
        (self.s0 - self.k * self.discount_factor()).max(0.0)
    }
}

impl Default for ModelParams {
    fn default() -> Self {
        ModelParams {
            s0: 100.0,
            r: 0.03,
            sigma: 0.4,
            t: 0.25,
            k: 105.0,
        }
    }
}

/// Validate the inputs the terminal-price sampler needs (no strike).
pub fn validate_spot_model(s0: f64, r: f64, sigma: f64, t: f64) -> PricingResult<()> {
    validate_positive("s0", s0)?;
    validate_finite("r", r)?;
    validate_non_negative("sigma", sigma)?;
    validate_non_negative("t", t)
}

/// Total variance σ²T, or `NumericalOverflow` once it no longer fits an f64.
///
/// Past that point d₁, d₂ and the GBM drift are all infinite and both pricers
/// would collapse to a meaningless 0.
pub fn total_variance(sigma: f64, t: f64) -> PricingResult<f64> {
    let variance = sigma * sigma * t;
    if variance.is_finite() {
        Ok(variance)
    } else {
        Err(PricingError::overflow(
            "total variance",
            format!("σ²T = {} for sigma={}, T={}", variance, sigma, t),
        ))
    }
}
