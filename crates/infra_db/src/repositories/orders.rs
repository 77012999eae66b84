//! Order repository
//!
//! Persists a confirmed enrollment - contract, order header, line items,
//! and the mile-ledger debit - inside one transaction. The debit is a
//! compare-and-decrement: the balance is re-checked by the UPDATE itself,
//! so two concurrent confirmations can never overdraw the same ledger.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use tracing::instrument;

use core_kernel::{DomainPort, LedgerEntryId, PortError};
use domain_billing::{MaterializedOrder, OrderWriter};

use crate::error::to_port_error;

/// PostgreSQL-backed implementation of the order write interface
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Creates a new OrderRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for OrderRepository {}

#[async_trait]
impl OrderWriter for OrderRepository {
    /// Writes the whole order atomically.
    ///
    /// The ledger decrement carries its own balance guard; when the balance
    /// no longer covers the spend the UPDATE matches no row, the
    /// transaction is dropped (rolled back), and the caller sees a
    /// `PortError::Conflict`.
    #[instrument(skip_all, fields(order_id = %order.order_id))]
    async fn persist(&self, order: &MaterializedOrder) -> Result<(), PortError> {
        let mut tx = self.pool.begin().await.map_err(to_port_error)?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO contracts (
                contract_id, brand_id, school_id, student_id, guardian_id, course_id,
                start_date, weekly_day_of_week, payment_method, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'active', $10)
            "#,
        )
        .bind(*order.contract.id.as_uuid())
        .bind(*order.tenant.brand_id.as_uuid())
        .bind(*order.tenant.school_id.as_uuid())
        .bind(*order.contract.student_id.as_uuid())
        .bind(*order.contract.guardian_id.as_uuid())
        .bind(*order.contract.course_id.as_uuid())
        .bind(order.contract.start_date)
        .bind(order.contract.weekly_day_of_week as i32)
        .bind(order.contract.payment_method.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(to_port_error)?;

        for schedule_id in &order.contract.schedule_ids {
            sqlx::query(
                r#"
                INSERT INTO contract_schedules (contract_id, schedule_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(*order.contract.id.as_uuid())
            .bind(*schedule_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(to_port_error)?;
        }

        sqlx::query(
            r#"
            INSERT INTO orders (
                order_id, contract_id, brand_id, school_id,
                subtotal, discount_total, grand_total, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, 'confirmed', $8)
            "#,
        )
        .bind(*order.order_id.as_uuid())
        .bind(*order.contract.id.as_uuid())
        .bind(*order.tenant.brand_id.as_uuid())
        .bind(*order.tenant.school_id.as_uuid())
        .bind(order.subtotal.as_units())
        .bind(order.discount_total.as_units())
        .bind(order.grand_total.as_units())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(to_port_error)?;

        for (position, line) in order.line_items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_line_items (
                    line_item_id, order_id, product_id, display_name, item_type,
                    billing_group, unit_price, quantity, tax_amount, total_with_tax,
                    calculation_note, position
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(*line.id.as_uuid())
            .bind(*order.order_id.as_uuid())
            .bind(line.item.product_id.map(|id| *id.as_uuid()))
            .bind(&line.item.display_name)
            .bind(line.item.category.as_str())
            .bind(line.group.as_str())
            .bind(line.item.unit_price.amount())
            .bind(line.item.quantity as i32)
            .bind(line.item.tax_amount.as_units())
            .bind(line.item.total_with_tax.as_units())
            .bind(line.item.calculation_note.as_deref())
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(to_port_error)?;
        }

        if let Some(debit) = &order.mile_debit {
            let updated = sqlx::query(
                r#"
                UPDATE mile_ledgers
                SET balance = balance - $1, updated_at = $2
                WHERE guardian_id = $3 AND brand_id = $4 AND balance >= $1
                RETURNING balance
                "#,
            )
            .bind(debit.miles as i32)
            .bind(now)
            .bind(*debit.guardian_id.as_uuid())
            .bind(*order.tenant.brand_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(to_port_error)?;

            let balance_after: i32 = match updated {
                Some(row) => row.get("balance"),
                // Dropping the transaction rolls back every write above
                None => {
                    return Err(PortError::conflict(format!(
                        "mile balance no longer covers a spend of {}",
                        debit.miles
                    )))
                }
            };

            sqlx::query(
                r#"
                INSERT INTO mile_ledger_entries (
                    entry_id, guardian_id, order_id, miles_spent,
                    balance_before, balance_after, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(*LedgerEntryId::new_v7().as_uuid())
            .bind(*debit.guardian_id.as_uuid())
            .bind(*order.order_id.as_uuid())
            .bind(debit.miles as i32)
            .bind(balance_after + debit.miles as i32)
            .bind(balance_after)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(to_port_error)?;
        }

        tx.commit().await.map_err(to_port_error)?;
        Ok(())
    }
}
