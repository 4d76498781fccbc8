// src/analytics/sample_stats.rs
use crate::error::{PricingError, PricingResult};
use ndarray::Array1;

/// Summary of a terminal price sample, as consumed by histogram plots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl SampleSummary {
    pub fn from_sample(sample: &Array1<f64>) -> PricingResult<Self> {
        let mean = sample.mean().ok_or_else(|| PricingError::InvalidConfiguration {
            field: "sample".to_string(),
            reason: "cannot summarise an empty sample".to_string(),
        })?;
        let (min, max) = sample
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
        let std_dev = if sample.len() > 1 { sample.std(1.0) } else { 0.0 };

        Ok(SampleSummary {
            count: sample.len(),
            mean,
            std_dev,
            min,
            max,
        })
    }
}
