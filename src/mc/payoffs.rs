//! Option Payoff Functions
//!
//! # Mathematical Definitions
//!
//! - **European Call**: max(S_T - K, 0), the right to buy at strike K
//!
//! # Implementation Notes
//!
//! Simulation is single-step, so payoffs see only the terminal price S_T.

use ndarray::Array1;

/// Supported option payoff types
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Payoff {
    /// European call option: max(S_T - K, 0)
    EuropeanCall { k: f64 },
}

impl Payoff {
    /// Payoff at a single terminal price. Never negative.
    pub fn calculate(&self, terminal_price: f64) -> f64 {
        match self {
            Payoff::EuropeanCall { k } => (terminal_price - k).max(0.0),
        }
    }

    /// Elementwise payoff over a terminal price sample, in sample order.
    pub fn calculate_all(&self, terminal_prices: &Array1<f64>) -> Array1<f64> {
        terminal_prices.mapv(|s| self.calculate(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_payoff() {
        let call = Payoff::EuropeanCall { k: 100.0 };
        assert_eq!(call.calculate(120.0), 20.0);
        assert_eq!(call.calculate(100.0), 0.0);
        assert_eq!(call.calculate(80.0), 0.0);
    }

    #[test]
    fn test_call_payoff_over_sample() {
        let call = Payoff::EuropeanCall { k: 105.0 };
        let prices = Array1::from(vec![90.0, 105.0, 110.5]);
        assert_eq!(call.calculate_all(&prices), Array1::from(vec![0.0, 0.0, 5.5]));
    }
}
