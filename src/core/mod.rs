//! Loan, allocation and portfolio math plus the seams to outside data

pub mod advisor;
pub mod amortization;
pub mod cache;
pub mod config;
pub mod loan;
pub mod log;
pub mod portfolio;
pub mod price;
pub mod strategy;

use anyhow::{Result, bail};

// Re-export main types for cleaner imports
pub use advisor::{AllocationRecommendation, LongTermProjection, Recommendation};
pub use amortization::{ProjectionOutcome, ProjectionResult};
pub use loan::{Loan, LoanRepository};
pub use price::{PriceProvider, PriceResult};
pub use strategy::{DebtStrategy, StrategyPayment};

/// Rejects amounts the allocation math would turn into nonsense. The core
/// functions pass such values through, so callers check before invoking them.
pub fn ensure_amount(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        bail!("{name} must be a finite number, got {value}");
    }
    if value < 0.0 {
        bail!("{name} must not be negative, got {value}");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_amount() {
        assert_eq!(ensure_amount("amount", 0.0).unwrap(), 0.0);
        assert_eq!(ensure_amount("amount", 250.5).unwrap(), 250.5);

        let err = ensure_amount("extra payment", -1.0).unwrap_err();
        assert_eq!(err.to_string(), "extra payment must not be negative, got -1");

        assert!(ensure_amount("amount", f64::NAN).is_err());
        assert!(ensure_amount("amount", f64::INFINITY).is_err());
    }
}
