//! Order materialization
//!
//! On confirmation the engine re-derives every amount from fresh catalog
//! and ledger reads - never from a cached preview - and hands the result to
//! an `OrderWriter` that persists contract, line items, and the mile debit
//! as one atomic unit.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};

use core_kernel::{
    ContractId, CourseId, DomainPort, GuardianId, LineItemId, Money, OrderId, PortError,
    ScheduleId, StudentId, TenantContext,
};

use crate::error::BillingError;
use crate::line_item::{GroupKey, LineItem};
use crate::preview::{BillingPreview, EnrollmentRequest};
use crate::service::BillingPreviewService;

/// How the guardian pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    BankTransfer,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Cash => "cash",
        }
    }
}

/// Confirmation request: the priced enrollment plus payment and schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmRequest {
    pub enrollment: EnrollmentRequest,
    pub payment_method: PaymentMethod,
    pub schedule_ids: Vec<ScheduleId>,
}

/// Lifecycle state of a confirmed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Confirmed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Confirmed => "confirmed",
        }
    }
}

/// A line item ready to persist, tagged with its billing group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedLineItem {
    pub id: LineItemId,
    pub group: GroupKey,
    pub item: LineItem,
}

/// The contract row created alongside the order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContract {
    pub id: ContractId,
    pub student_id: StudentId,
    pub guardian_id: GuardianId,
    pub course_id: CourseId,
    pub start_date: NaiveDate,
    pub weekly_day_of_week: u8,
    pub schedule_ids: Vec<ScheduleId>,
    pub payment_method: PaymentMethod,
}

/// A mile-ledger debit to apply inside the order transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MileDebit {
    pub guardian_id: GuardianId,
    pub miles: u32,
    pub discount: Money,
}

/// Everything one confirmation persists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterializedOrder {
    pub order_id: OrderId,
    pub tenant: TenantContext,
    pub contract: NewContract,
    pub line_items: Vec<PersistedLineItem>,
    pub mile_debit: Option<MileDebit>,
    pub subtotal: Money,
    pub discount_total: Money,
    pub grand_total: Money,
}

/// Persists a materialized order.
///
/// Implementations must write the contract, every line item, and the mile
/// debit in one all-or-nothing transaction, re-checking the mile balance
/// inside that transaction and failing with `PortError::Conflict` when it
/// no longer covers the spend. Two concurrent confirmations for the same
/// guardian must never both succeed if their combined debit would exceed
/// the balance.
#[async_trait]
pub trait OrderWriter: DomainPort {
    async fn persist(&self, order: &MaterializedOrder) -> Result<(), PortError>;
}

/// Fire-and-forget task/notification creation after a confirmed order
#[async_trait]
pub trait NotificationPort: DomainPort {
    async fn order_confirmed(
        &self,
        tenant: &TenantContext,
        order_id: OrderId,
        student_id: StudentId,
    ) -> Result<(), PortError>;
}

/// What the confirm endpoint returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedOrder {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub mile_discount: Money,
    pub miles_used: u32,
}

/// Turns a computed preview into persistable rows.
///
/// Group items keep their calculation notes; the ticket-bundle charge is
/// persisted under the current-month group. Amounts are copied verbatim
/// from the preview, so persisted rows always match what was computed.
pub fn materialize(
    tenant: &TenantContext,
    request: &ConfirmRequest,
    preview: &BillingPreview,
) -> MaterializedOrder {
    let order_id = OrderId::new_v7();

    let mut line_items = Vec::new();
    for group in &preview.groups {
        for item in &group.items {
            line_items.push(PersistedLineItem {
                id: LineItemId::new_v7(),
                group: group.key,
                item: item.clone(),
            });
        }
    }
    if let Some(item) = &preview.enrollment_tuition_item {
        line_items.push(PersistedLineItem {
            id: LineItemId::new_v7(),
            group: GroupKey::CurrentMonth,
            item: item.clone(),
        });
    }

    let mile_debit = preview.discounts.first().map(|discount| MileDebit {
        guardian_id: request.enrollment.guardian_id,
        miles: discount.miles,
        discount: discount.amount,
    });

    MaterializedOrder {
        order_id,
        tenant: *tenant,
        contract: NewContract {
            id: ContractId::new_v7(),
            student_id: request.enrollment.student_id,
            guardian_id: request.enrollment.guardian_id,
            course_id: request.enrollment.course_id,
            start_date: request.enrollment.start_date,
            weekly_day_of_week: request.enrollment.weekly_day_of_week,
            schedule_ids: request.schedule_ids.clone(),
            payment_method: request.payment_method,
        },
        line_items,
        mile_debit,
        subtotal: preview.subtotal,
        discount_total: preview.discount_total,
        grand_total: preview.grand_total,
    }
}

/// Confirms enrollments by re-running the calculation and persisting it
pub struct OrderMaterializer {
    service: BillingPreviewService,
    writer: Arc<dyn OrderWriter>,
    notifier: Arc<dyn NotificationPort>,
}

impl OrderMaterializer {
    pub fn new(
        service: BillingPreviewService,
        writer: Arc<dyn OrderWriter>,
        notifier: Arc<dyn NotificationPort>,
    ) -> Self {
        Self {
            service,
            writer,
            notifier,
        }
    }

    /// Confirms one enrollment.
    ///
    /// Re-derives every amount from fresh collaborator reads, re-validating
    /// mile eligibility and balance; the earlier preview is never trusted.
    /// The writer then applies the whole order atomically, so a balance
    /// that moved between preview and confirm surfaces as a conflict
    /// instead of an overdraft.
    ///
    /// # Errors
    ///
    /// Everything `BillingPreviewService::preview` rejects, plus
    /// `Port(Conflict)` when the transactional debit loses the race.
    #[instrument(skip_all, fields(student = %request.enrollment.student_id))]
    pub async fn confirm(
        &self,
        tenant: &TenantContext,
        request: &ConfirmRequest,
    ) -> Result<ConfirmedOrder, BillingError> {
        let preview = self.service.preview(tenant, &request.enrollment).await?;
        let order = materialize(tenant, request, &preview);

        self.writer.persist(&order).await?;

        if let Err(error) = self
            .notifier
            .order_confirmed(tenant, order.order_id, request.enrollment.student_id)
            .await
        {
            // Notification delivery is not part of the order transaction
            warn!(%error, order_id = %order.order_id, "order confirmation notification failed");
        }

        let (mile_discount, miles_used) = match &order.mile_debit {
            Some(debit) => (debit.discount, debit.miles),
            None => (Money::yen(0), 0),
        };

        Ok(ConfirmedOrder {
            order_id: order.order_id,
            status: OrderStatus::Confirmed,
            mile_discount,
            miles_used,
        })
    }
}
