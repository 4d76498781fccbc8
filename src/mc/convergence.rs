// src/mc/convergence.rs
//! Convergence of the Monte Carlo estimator towards the closed form
//!
//! For each path count n the study runs several independently seeded batch
//! estimates and records their mean absolute error against the Black-Scholes
//! price and their spread. The spread should shrink like 1/√n.

use crate::analytics::bs_analytic::price_call_bs_params;
use crate::error::{validation::validate_paths, PricingError, PricingResult};
use crate::mc::mc_engine::{mc_price_call_gbm, McConfig};
use crate::models::params::ModelParams;
use crate::rng;
use ndarray::Array1;
use rand::Rng;
use tracing::info;

#[derive(Clone, Debug, PartialEq)]
pub struct ConvergenceConfig {
    pub path_counts: Vec<usize>,
    pub repetitions: usize,
    pub seed: u64,
    pub params: ModelParams,
}

impl ConvergenceConfig {
    pub fn validate(&self) -> PricingResult<()> {
        self.params.validate()?;
        if self.path_counts.is_empty() {
            return Err(PricingError::InvalidConfiguration {
                field: "path_counts".to_string(),
                reason: "at least one path count is required".to_string(),
            });
        }
        if self.repetitions < 2 {
            return Err(PricingError::InvalidConfiguration {
                field: "repetitions".to_string(),
                reason: format!("need at least 2 runs for a spread, got {}", self.repetitions),
            });
        }
        self.path_counts.iter().try_for_each(|&n| validate_paths(n))
    }
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        ConvergenceConfig {
            path_counts: vec![100, 10_000, 1_000_000],
            repetitions: 20,
            seed: 12345,
            params: ModelParams::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConvergencePoint {
    pub paths: usize,
    pub repetitions: usize,
    pub reference_price: f64,
    pub mean_price: f64,
    pub mean_abs_error: f64,
    /// Sample standard deviation of the price across repetitions
    pub std_dev: f64,
    /// Average of the per-run standard error estimates
    pub mean_std_error: f64,
}

pub fn convergence_study(cfg: &ConvergenceConfig) -> PricingResult<Vec<ConvergencePoint>> {
    cfg.validate()?;
    let reference_price = price_call_bs_params(&cfg.params)?;
    let mut seeder = rng::seed_rng_from_u64(cfg.seed);

    cfg.path_counts
        .iter()
        .map(|&paths| -> PricingResult<ConvergencePoint> {
            let mut prices = Vec::with_capacity(cfg.repetitions);
            let mut std_errors = Vec::with_capacity(cfg.repetitions);
            for _ in 0..cfg.repetitions {
                let run = McConfig {
                    paths,
                    seed: seeder.gen(),
                    params: cfg.params,
                };
                let estimate = mc_price_call_gbm(&run)?;
                prices.push(estimate.price);
                std_errors.push(estimate.std_error);
            }

            let prices = Array1::from(prices);
            let reps = cfg.repetitions as f64;
            let point = ConvergencePoint {
                paths,
                repetitions: cfg.repetitions,
                reference_price,
                mean_price: prices.sum() / reps,
                mean_abs_error: prices.mapv(|p| (p - reference_price).abs()).sum() / reps,
                std_dev: prices.std(1.0),
                mean_std_error: std_errors.iter().sum::<f64>() / reps,
            };
            info!(
                paths,
                mean_price = point.mean_price,
                mean_abs_error = point.mean_abs_error,
                std_dev = point.std_dev,
                "convergence level done"
            );
            Ok(point)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_config() {
        let empty = ConvergenceConfig {
            path_counts: vec![],
            ..Default::default()
        };
        assert!(matches!(
            convergence_study(&empty),
            Err(PricingError::InvalidConfiguration { .. })
        ));

        let single_run = ConvergenceConfig {
            repetitions: 1,
            ..Default::default()
        };
        assert!(convergence_study(&single_run).is_err());

        let zero_paths = ConvergenceConfig {
            path_counts: vec![100, 0],
            ..Default::default()
        };
        assert!(matches!(
            convergence_study(&zero_paths),
            Err(PricingError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_spread_shrinks_like_inverse_sqrt_n() {
        let cfg = ConvergenceConfig {
            path_counts: vec![100, 10_000],
            repetitions: 30,
            seed: 2024,
            ..Default::default()
        };
        let points = convergence_study(&cfg).unwrap();
        assert_eq!(points.len(), 2);

        let ratio = points[0].std_dev / points[1].std_dev;
        assert!(ratio > 4.0 && ratio < 25.0, "std dev ratio {} far from 10", ratio);
        assert!(points[1].mean_abs_error < points[0].mean_abs_error);

        // per-run standard error agrees with the observed spread
        let se_ratio = points[1].mean_std_error / points[1].std_dev;
        assert!(se_ratio > 0.5 && se_ratio < 2.0, "se/std ratio {}", se_ratio);
    }

    #[test]
    fn test_study_is_reproducible() {
        let cfg = ConvergenceConfig {
            path_counts: vec![500],
            repetitions: 5,
            ..Default::default()
        };
        assert_eq!(convergence_study(&cfg).unwrap(), convergence_study(&cfg).unwrap());
    }
}
