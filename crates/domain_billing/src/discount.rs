//! Mile discounts
//!
//! Guardians accumulate miles and can redeem them against an enrollment's
//! grand total. The ledger collaborator owns the balance, the eligibility
//! rule, and the miles-to-yen curve; this module owns the spend gates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, GuardianId, Money, PortError, TenantContext};

use crate::error::BillingError;

/// The smallest positive mile spend the business accepts
pub const MINIMUM_MILE_SPEND: u32 = 4;

/// Read access to the guardian's mile ledger
#[async_trait]
pub trait MileLedgerPort: DomainPort {
    /// Current mile balance
    async fn balance(&self, tenant: &TenantContext, guardian: GuardianId)
        -> Result<u32, PortError>;

    /// True only when the guardian holds at least two active contracts
    async fn can_use_miles(
        &self,
        tenant: &TenantContext,
        guardian: GuardianId,
    ) -> Result<bool, PortError>;

    /// Deterministic, monotonic mapping from miles spent to yen discount
    async fn discount_for(&self, miles: u32) -> Result<Money, PortError>;
}

/// Snapshot of what the guardian could spend, shown on the preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MileInfo {
    pub balance: u32,
    pub eligible: bool,
    pub minimum_spend: u32,
}

impl MileInfo {
    pub fn new(balance: u32, eligible: bool) -> Self {
        Self {
            balance,
            eligible,
            minimum_spend: MINIMUM_MILE_SPEND,
        }
    }

    /// True when the preview should offer the discount at all
    pub fn offer_available(&self) -> bool {
        self.eligible && self.balance >= MINIMUM_MILE_SPEND
    }
}

/// A resolved spend: the miles and the yen they are worth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MileSpend {
    pub miles: u32,
    pub discount: Money,
}

/// A named, itemized reduction applied once to the grand total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountLine {
    pub name: String,
    pub miles: u32,
    pub amount: Money,
}

impl DiscountLine {
    pub fn from_spend(spend: &MileSpend) -> Self {
        Self {
            name: "Mile discount".to_string(),
            miles: spend.miles,
            amount: spend.discount,
        }
    }
}

/// Gates a requested mile spend against the ledger snapshot.
///
/// A zero spend means "no discount requested" and always passes.
///
/// # Errors
///
/// - `MilesNotAllowed` when the guardian holds fewer than two active contracts
/// - `BelowMinimumMiles` for a positive spend under the minimum
/// - `InsufficientMiles` for a spend over the current balance
pub fn validate_mile_spend(miles_to_use: u32, info: &MileInfo) -> Result<(), BillingError> {
    if miles_to_use == 0 {
        return Ok(());
    }
    if !info.eligible {
        return Err(BillingError::MilesNotAllowed);
    }
    if miles_to_use < MINIMUM_MILE_SPEND {
        return Err(BillingError::BelowMinimumMiles {
            requested: miles_to_use,
            minimum: MINIMUM_MILE_SPEND,
        });
    }
    if miles_to_use > info.balance {
        return Err(BillingError::InsufficientMiles {
            requested: miles_to_use,
            balance: info.balance,
        });
    }
    Ok(())
}
