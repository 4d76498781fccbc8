// src/analytics/bs_analytic.rs
//! Closed-form Black-Scholes price of a European call
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model the underlying follows
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//! and the risk-neutral price of a call is
//! ```text
//! C = e^(-rT) * E^Q[max(S_T - K, 0)] = S*Φ(d₁) - K*e^(-rT)*Φ(d₂)
//! ```
//!
//! This is the reference value the Monte Carlo estimator converges to.

use crate::error::{PricingError, PricingResult};
use crate::math_utils::norm_cdf;
use crate::models::params::{total_variance, ModelParams};
use tracing::debug;

/// d₁ and d₂ of the Black-Scholes formula
///
/// # Formula
/// ```text
/// d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T)
/// d₂ = d₁ - σ√T
/// ```
///
/// Returns `None` when σ√T = 0, where both are undefined.
pub fn bs_call_d1_d2(s0: f64, r: f64, sigma: f64, t: f64, k: f64) -> Option<(f64, f64)> {
    let vol_sqrt_t = sigma * t.sqrt();
    if vol_sqrt_t == 0.0 {
        return None;
    }
    let d1 = ((s0 / k).ln() + (r + 0.5 * sigma * sigma) * t) / vol_sqrt_t;
    Some((d1, d1 - vol_sqrt_t))
}

/// Black-Scholes European call option price
///
/// # Formula
/// ```text
/// C(S,K,r,σ,T) = Φ(d₁)*S - Φ(d₂)*K*e^(-rT)
/// ```
///
/// # Degenerate inputs
///
/// When σ = 0 or T = 0 the terminal price is deterministic and the value is
/// `max(S - K*e^(-rT), 0)`, which reduces to `max(S - K, 0)` at T = 0.
///
/// # Parameters
/// - `s0`: Current stock price (> 0)
/// - `r`: Risk-free rate
/// - `sigma`: Volatility (≥ 0)
/// - `t`: Time to expiration in years (≥ 0)
/// - `k`: Strike price (> 0)
///
/// # Errors
///
/// `InvalidParameter` for out-of-domain or non-finite inputs,
/// `NumericalOverflow` if σ²T or the formula value is not finite.
pub fn price_call_bs(s0: f64, r: f64, sigma: f64, t: f64, k: f64) -> PricingResult<f64> {
    let params = ModelParams::new(s0, r, sigma, t, k);
    params.validate()?;
    total_variance(sigma, t)?;

    let raw = match bs_call_d1_d2(s0, r, sigma, t, k) {
        None => {
            let intrinsic = params.intrinsic_forward_value();
            debug!(s0, k, sigma, t, intrinsic, "σ√T = 0, pricing at intrinsic value");
            intrinsic
        }
        Some((d1, d2)) => norm_cdf(d1) * s0 - norm_cdf(d2) * k * params.discount_factor(),
    };

    // Checked before flooring: f64::max(NaN, 0.0) is 0.0
    if !raw.is_finite() {
        return Err(PricingError::overflow(
            "Black-Scholes",
            format!(
                "price is not finite for s0={}, r={}, sigma={}, t={}, k={}",
                s0, r, sigma, t, k
            ),
        ));
    }

    // Deep out-of-the-money rounding can leave a tiny negative
    Ok(raw.max(0.0))
}

/// Closed-form price for a [`ModelParams`] bundle.
pub fn price_call_bs_params(params: &ModelParams) -> PricingResult<f64> {
    price_call_bs(params.s0, params.r, params.sigma, params.t, params.k)
}
