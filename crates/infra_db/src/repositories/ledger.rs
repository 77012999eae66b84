//! Mile ledger repository
//!
//! Reads the guardian's mile balance and eligibility, and resolves the
//! miles-to-yen discount curve. Debits are not written here: they happen
//! inside the order transaction so the balance check and the decrement are
//! one atomic step.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{Currency, DomainPort, GuardianId, Money, PortError, TenantContext};
use domain_billing::MileLedgerPort;

use crate::error::to_port_error;

/// Yen value of one mile when no setting row exists
const DEFAULT_YEN_PER_MILE: i64 = 500;

/// Number of active contracts required before miles can be spent
const ELIGIBILITY_CONTRACT_COUNT: i64 = 2;

/// PostgreSQL-backed implementation of the mile ledger read interface
#[derive(Debug, Clone)]
pub struct MileLedgerRepository {
    pool: PgPool,
}

impl MileLedgerRepository {
    /// Creates a new MileLedgerRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for MileLedgerRepository {}

#[async_trait]
impl MileLedgerPort for MileLedgerRepository {
    #[instrument(skip(self), fields(tenant = %tenant))]
    async fn balance(
        &self,
        tenant: &TenantContext,
        guardian: GuardianId,
    ) -> Result<u32, PortError> {
        let row: Option<(i32,)> = sqlx::query_as(
            r#"
            SELECT balance
            FROM mile_ledgers
            WHERE guardian_id = $1 AND brand_id = $2
            "#,
        )
        .bind(*guardian.as_uuid())
        .bind(*tenant.brand_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(to_port_error)?;

        // A guardian without a ledger row simply has no miles yet
        Ok(row.map(|(balance,)| balance.max(0) as u32).unwrap_or(0))
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    async fn can_use_miles(
        &self,
        tenant: &TenantContext,
        guardian: GuardianId,
    ) -> Result<bool, PortError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM contracts
            WHERE guardian_id = $1 AND brand_id = $2 AND status = 'active'
            "#,
        )
        .bind(*guardian.as_uuid())
        .bind(*tenant.brand_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(to_port_error)?;

        Ok(count >= ELIGIBILITY_CONTRACT_COUNT)
    }

    async fn discount_for(&self, miles: u32) -> Result<Money, PortError> {
        let row: Option<(Decimal,)> = sqlx::query_as(
            r#"
            SELECT yen_per_mile
            FROM mile_discount_settings
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(to_port_error)?;

        let yen_per_mile = row
            .map(|(rate,)| rate)
            .unwrap_or_else(|| Decimal::new(DEFAULT_YEN_PER_MILE, 0));

        Ok(Money::new(yen_per_mile * Decimal::from(miles), Currency::JPY).truncate_to_unit())
    }
}
