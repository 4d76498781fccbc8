// src/mc/mc_engine.rs
use crate::error::{validation::*, PricingError, PricingResult};
use crate::mc::payoffs::Payoff;
use crate::models::gbm::Gbm;
use crate::models::params::ModelParams;
use crate::rng::{self, RngFactory};
use ndarray::Array1;
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Payoff sums are reduced over fixed-size chunks in index order, so the
/// floating-point result does not depend on how rayon schedules the work.
pub const SUM_CHUNK: usize = 8_192;

/// Paths per independently seeded generator in batch runs.
pub const BATCH_CHUNK: usize = 8_192;

/// Below this many paths the estimate is valid but noisy enough to warn.
pub const MIN_RECOMMENDED_PATHS: usize = 1_000;

#[derive(Clone, Debug, PartialEq)]
pub struct McConfig {
    pub paths: usize,
    pub seed: u64,
    pub params: ModelParams,
}

impl McConfig {
    /// Validate the Monte Carlo configuration
    pub fn validate(&self) -> PricingResult<()> {
        self.params.validate()?;
        validate_paths(self.paths)
    }
}

impl Default for McConfig {
    fn default() -> Self {
        McConfig {
            paths: 100_000,
            seed: 12345,
            params: ModelParams::default(),
        }
    }
}

/// Monte Carlo price together with its sampling error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct McEstimate {
    pub price: f64,
    /// Variance of the estimator (sample payoff variance / n, discounted)
    pub variance: f64,
    pub std_error: f64,
    pub paths: usize,
}

impl McEstimate {
    /// `price ± z * std_error`, lower end floored at zero.
    pub fn confidence_interval(&self, z: f64) -> (f64, f64) {
        let half_width = z * self.std_error;
        ((self.price - half_width).max(0.0), self.price + half_width)
    }
}

fn chunked_sum(values: &[f64]) -> f64 {
    values
        .par_chunks(SUM_CHUNK)
        .map(|chunk| chunk.iter().sum::<f64>())
        .collect::<Vec<f64>>()
        .iter()
        .sum()
}

fn payoff_sum(payoffs: &Array1<f64>) -> f64 {
    match payoffs.as_slice() {
        Some(slice) => chunked_sum(slice),
        None => payoffs.sum(),
    }
}

fn warn_if_noisy(paths: usize) {
    if paths < MIN_RECOMMENDED_PATHS {
        warn!(
            paths,
            recommended = MIN_RECOMMENDED_PATHS,
            "few Monte Carlo paths, standard error will be large"
        );
    }
}

/// Monte Carlo price of a European call under risk-neutral GBM
///
/// # Algorithm
///
/// 1. Draw n independent N(0,1) samples from `rng`
/// 2. S_i = S_0 * exp((r - σ²/2)T + σ√T * Z_i)
/// 3. payoff_i = max(S_i - K, 0)
/// 4. price = e^(-rT) * (Σ payoff_i) / n
///
/// The estimator is unbiased with standard error O(1/√n). Given the same
/// seeded generator the result is bit-for-bit identical.
///
/// # Errors
///
/// `InvalidParameter` for invalid model inputs or `n == 0`, checked before any
/// draw; `NumericalOverflow` if the simulated prices or the average overflow.
pub fn price_call_mc<R: Rng + ?Sized>(
    s0: f64,
    r: f64,
    sigma: f64,
    t: f64,
    k: f64,
    n: usize,
    rng: &mut R,
) -> PricingResult<f64> {
    let params = ModelParams::new(s0, r, sigma, t, k);
    params.validate()?;
    validate_paths(n)?;
    warn_if_noisy(n);

    let z = rng::standard_normal_sample(n, rng);
    let terminal = Gbm { s0, r, sigma }.terminal_prices(t, &z)?;
    let payoffs = Payoff::EuropeanCall { k }.calculate_all(&terminal);

    let forward_value = payoff_sum(&payoffs) / n as f64;
    let price = forward_value * params.discount_factor();

    if !price.is_finite() {
        return Err(PricingError::overflow(
            "Monte Carlo",
            format!("price estimate is not finite: {}", price),
        ));
    }

    debug!(n, price, forward_value, "monte carlo call price");
    Ok(price)
}

/// Count, mean and centred sum of squares of a block of payoffs.
///
/// Blocks merge with Chan's pairwise update; the variance is never formed as
/// `E[x²] - E[x]²`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct PayoffMoments {
    count: usize,
    mean: f64,
    m2: f64,
}

impl PayoffMoments {
    fn from_block(payoffs: &Array1<f64>) -> Self {
        let count = payoffs.len();
        if count == 0 {
            return Self::default();
        }
        let mean = payoffs.sum() / count as f64;
        let m2 = payoffs.iter().map(|x| (x - mean) * (x - mean)).sum();
        PayoffMoments { count, mean, m2 }
    }

    fn merge(&self, other: &Self) -> Self {
        if self.count == 0 {
            return *other;
        }
        if other.count == 0 {
            return *self;
        }
        let (na, nb) = (self.count as f64, other.count as f64);
        let total = na + nb;
        let delta = other.mean - self.mean;
        PayoffMoments {
            count: self.count + other.count,
            mean: self.mean + delta * nb / total,
            m2: self.m2 + other.m2 + delta * delta * na * nb / total,
        }
    }
}

/// Seeded, chunk-parallel Monte Carlo run returning price and standard error.
///
/// Each block of `BATCH_CHUNK` paths draws from its own `StdRng` derived from
/// `(cfg.seed, block index)`, so the estimate is reproducible for any number
/// of worker threads.
pub fn mc_price_call_gbm(cfg: &McConfig) -> PricingResult<McEstimate> {
    cfg.validate()?;
    warn_if_noisy(cfg.paths);

    let p = cfg.params;
    let gbm = Gbm {
        s0: p.s0,
        r: p.r,
        sigma: p.sigma,
    };
    let payoff = Payoff::EuropeanCall { k: p.k };
    let factory = RngFactory::new(cfg.seed);
    let n = cfg.paths;
    let blocks = (n + BATCH_CHUNK - 1) / BATCH_CHUNK;

    let partials = (0..blocks)
        .into_par_iter()
        .map(|block| -> PricingResult<PayoffMoments> {
            let len = BATCH_CHUNK.min(n - block * BATCH_CHUNK);
            let mut rng = factory.create_std_rng(block as u64);
            let z = rng::standard_normal_sample(len, &mut rng);
            let payoffs = payoff.calculate_all(&gbm.terminal_prices(p.t, &z)?);
            Ok(PayoffMoments::from_block(&payoffs))
        })
        .collect::<PricingResult<Vec<PayoffMoments>>>()?;

    let moments = partials
        .iter()
        .fold(PayoffMoments::default(), |acc, part| acc.merge(part));

    let n_f = n as f64;
    let discount = p.discount_factor();
    let mean_payoff = moments.mean;
    let sample_variance = if n > 1 { moments.m2 / (n_f - 1.0) } else { 0.0 };

    let price = discount * mean_payoff;
    let variance = discount * discount * sample_variance / n_f;

    if !price.is_finite() || !variance.is_finite() {
        return Err(PricingError::overflow(
            "Monte Carlo",
            format!("estimate is not finite: price {}, variance {}", price, variance),
        ));
    }

    let estimate = McEstimate {
        price,
        variance,
        std_error: variance.sqrt(),
        paths: n,
    };
    debug!(
        paths = n,
        seed = cfg.seed,
        price,
        std_error = estimate.std_error,
        "batch monte carlo call price"
    );
    Ok(estimate)
}
