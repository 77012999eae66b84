//! Billing domain errors
//!
//! Recoverable catalog gaps (a missing enrollment-tuition bundle, a month
//! with no price override) are not represented here: the engine falls back
//! or omits the line and keeps going.

use core_kernel::{MoneyError, PortError};
use thiserror::Error;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// A referenced course, pack, product, or student does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request was malformed and rejected before any computation
    #[error("Validation error: {0}")]
    Validation(String),

    /// The guardian does not hold enough active contracts to spend miles
    #[error("Guardian is not eligible to spend miles")]
    MilesNotAllowed,

    /// A positive mile spend below the minimum
    #[error("Mile spend {requested} is below the minimum of {minimum}")]
    BelowMinimumMiles { requested: u32, minimum: u32 },

    /// A mile spend above the current balance
    #[error("Mile spend {requested} exceeds the balance of {balance}")]
    InsufficientMiles { requested: u32, balance: u32 },

    /// The computed grand total came out negative; upstream inputs must be
    /// clamped, this stage surfaces the defect instead of hiding it
    #[error("Grand total must not be negative, got {0}")]
    NegativeTotal(i64),

    /// Money arithmetic failure
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Collaborator failure
    #[error(transparent)]
    Port(PortError),
}

impl BillingError {
    pub fn validation(message: impl Into<String>) -> Self {
        BillingError::Validation(message.into())
    }
}

impl From<PortError> for BillingError {
    fn from(err: PortError) -> Self {
        if err.is_not_found() {
            BillingError::NotFound(err.to_string())
        } else {
            BillingError::Port(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_not_found_becomes_billing_not_found() {
        let err: BillingError = PortError::not_found("Course", "CRS-1").into();
        assert!(matches!(err, BillingError::NotFound(_)));
    }

    #[test]
    fn test_other_port_errors_stay_wrapped() {
        let err: BillingError = PortError::conflict("balance moved").into();
        assert!(matches!(err, BillingError::Port(PortError::Conflict { .. })));
    }
}
