// src/error.rs
use thiserror::Error;

/// Errors raised by the pricing engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// A model parameter or path count outside its domain
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameter {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Malformed batch or convergence configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// exp() overflowed or a result stopped being finite
    #[error("Numerical overflow in {method}: {reason}")]
    NumericalOverflow { method: String, reason: String },
}

impl PricingError {
    pub fn overflow(method: &str, reason: impl Into<String>) -> Self {
        PricingError::NumericalOverflow {
            method: method.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Validation utilities
pub mod validation {
    use super::{PricingError, PricingResult};

    /// Hard cap on a single Monte Carlo batch
    pub const MAX_PATHS: usize = 1_000_000_000;

    fn invalid(name: &str, value: f64, constraint: &str) -> PricingError {
        PricingError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: constraint.to_string(),
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> PricingResult<()> {
        if !value.is_finite() {
            Err(invalid(name, value, "must be finite (not NaN or infinite)"))
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is finite and positive
    pub fn validate_positive(name: &str, value: f64) -> PricingResult<()> {
        validate_finite(name, value)?;
        if value <= 0.0 {
            Err(invalid(name, value, "must be positive (> 0)"))
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is finite and non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> PricingResult<()> {
        validate_finite(name, value)?;
        if value < 0.0 {
            Err(invalid(name, value, "must be non-negative (≥ 0)"))
        } else {
            Ok(())
        }
    }

    /// Validate a Monte Carlo path count
    pub fn validate_paths(paths: usize) -> PricingResult<()> {
        if paths == 0 {
            Err(invalid("paths", 0.0, "must be at least 1"))
        } else if paths > MAX_PATHS {
            Err(PricingError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: format!("exceeds maximum allowed ({})", MAX_PATHS),
            })
        } else {
            Ok(())
        }
    }
}
