//! # bsm-pricer: European Calls under Black-Scholes-Merton
//!
//! Prices a European call on a stock following geometric Brownian motion two
//! ways, so the results can be compared directly:
//!
//! - **Monte Carlo**: simulate terminal prices with the exact GBM solution,
//!   average the discounted call payoff
//! - **Closed form**: the analytic Black-Scholes formula
//!
//! Randomness is always passed in as a seedable generator; there is no global
//! random state, so every Monte Carlo result is reproducible.
//!
//! ## Quick Start
//!
//! ```rust
//! use bsm_pricer::{price_call_bs, price_call_mc, simulate_terminal_prices};
//! use bsm_pricer::rng::seed_rng_from_u64;
//!
//! let mut rng = seed_rng_from_u64(42);
//!
//! let exact = price_call_bs(100.0, 0.03, 0.4, 0.25, 105.0).expect("valid inputs");
//! let estimate = price_call_mc(100.0, 0.03, 0.4, 0.25, 105.0, 200_000, &mut rng)
//!     .expect("valid inputs");
//! assert!((exact - estimate).abs() < 0.1);
//!
//! let terminal = simulate_terminal_prices(100.0, 0.03, 0.4, 0.25, 1_000, &mut rng)
//!     .expect("valid inputs");
//! assert_eq!(terminal.len(), 1_000);
//! ```
//!
//! ## Batch runs
//!
//! [`mc::mc_engine::mc_price_call_gbm`] takes an [`McConfig`] with a seed and
//! returns the price with its standard error; [`mc::convergence`] measures how
//! the estimator approaches the closed form as the path count grows.

pub mod analytics;
pub mod error;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod output;
pub mod rng;

pub use analytics::bs_analytic::price_call_bs;
pub use error::{PricingError, PricingResult};
pub use mc::mc_engine::{price_call_mc, McConfig, McEstimate};
pub use models::gbm::simulate_terminal_prices;
pub use models::params::ModelParams;
