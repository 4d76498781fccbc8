// src/rng.rs
//! Random Number Generation for Monte Carlo Pricing
//!
//! # Design Philosophy
//!
//! Every sampler in this crate takes its generator as an argument. There is no
//! ambient or thread-local source, so:
//! 1. **Reproducibility**: same seed → same draws → same price
//! 2. **Parallel safety**: batch runs give each chunk its own `StdRng`
//! 3. **Freshness**: samples are drawn per call and never cached
//!
//! # Stream Derivation
//!
//! Batch runs derive one stream per chunk from `(base_seed, stream_id)` with a
//! splitmix64 finalizer, so neighbouring seeds never share chunk streams:
//! ```text
//! z = base_seed + (stream_id + 1) * 0x9e3779b97f4a7c15
//! z = (z ⊕ (z >> 30)) * 0xbf58476d1ce4e5b9
//! z = (z ⊕ (z >> 27)) * 0x94d049bb133111eb
//! seed = z ⊕ (z >> 31)
//! ```

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

fn splitmix64(base_seed: u64, stream_id: u64) -> u64 {
    let mut z = base_seed.wrapping_add(stream_id.wrapping_add(1).wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// RNG factory for reproducible parallel simulations
#[derive(Debug, Clone, Copy)]
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Independent generator for one chunk/repetition
    pub fn create_std_rng(&self, stream_id: u64) -> StdRng {
        StdRng::seed_from_u64(splitmix64(self.base_seed, stream_id))
    }
}

pub fn seed_rng_from_u64(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

/// Draw `n` independent N(0,1) variates from `rng`, in draw order.
pub fn standard_normal_sample<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Array1<f64> {
    Array1::from_shape_fn(n, |_| get_normal_draw(rng))
}
