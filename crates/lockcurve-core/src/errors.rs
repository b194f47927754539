//! # Core Error Types
//!
//! Every failure in the core is returned as a typed `LockCurveError`; nothing
//! is logged, retried or replaced with a default value here.

use thiserror::Error;

/// Errors produced by curve math, liquidity simulation and order placement
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LockCurveError {
    // ========================================================================
    // Domain Violations
    // ========================================================================

    #[error("Invalid price: must be greater than zero")]
    InvalidPrice,

    #[error("Price {price} is below the domain minimum {min}")]
    PriceBelowMinimum { price: u128, min: u128 },

    #[error("Price {price} is above the domain maximum {max}")]
    PriceAboveMaximum { price: u128, max: u128 },

    #[error("Price pair is not monotonic for this direction: start {start}, end {end}")]
    NonMonotonicPrices { start: u128, end: u128 },

    #[error("Fee {fee} exceeds maximum {max}")]
    FeeTooHigh { fee: u64, max: u64 },

    #[error("Non-positive result: {0}")]
    NonPositiveResult(&'static str),

    // ========================================================================
    // Overflow
    // ========================================================================

    #[error("Overflow: {0}")]
    Overflow(&'static str),

    // ========================================================================
    // Resource Exhaustion
    // ========================================================================

    #[error("No viable stop-loss price found after {0} iterations")]
    MaxIterationsReached(u32),

    #[error("Price adjustment left the domain at {0}")]
    PriceOutOfBounds(u128),

    // ========================================================================
    // Malformed Input and Configuration
    // ========================================================================

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid config value for '{field}': got {value}, expected {expected}")]
    InvalidConfig {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Result type using core errors
pub type CoreResult<T> = Result<T, LockCurveError>;

impl LockCurveError {
    /// Create an invalid input error with a reason
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(
        field: &'static str,
        value: impl ToString,
        expected: &'static str,
    ) -> Self {
        Self::InvalidConfig {
            field,
            value: value.to_string(),
            expected,
        }
    }

    /// Whether the error is a domain violation (the quote is not computable)
    pub fn is_domain_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidPrice
                | Self::PriceBelowMinimum { .. }
                | Self::PriceAboveMaximum { .. }
                | Self::NonMonotonicPrices { .. }
                | Self::FeeTooHigh { .. }
                | Self::NonPositiveResult(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LockCurveError::MaxIterationsReached(1000);
        assert_eq!(
            format!("{}", err),
            "No viable stop-loss price found after 1000 iterations"
        );

        let err = LockCurveError::invalid_config("max_orders_count", 0, "greater than 0");
        assert!(format!("{}", err).contains("max_orders_count"));
    }

    #[test]
    fn test_domain_violation_classification() {
        assert!(LockCurveError::InvalidPrice.is_domain_violation());
        assert!(LockCurveError::NonPositiveResult("token out").is_domain_violation());
        assert!(!LockCurveError::Overflow("u64").is_domain_violation());
        assert!(!LockCurveError::MaxIterationsReached(1).is_domain_violation());
        assert!(!LockCurveError::invalid_input("unsorted").is_domain_violation());
    }
}
