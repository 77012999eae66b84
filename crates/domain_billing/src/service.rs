//! Preview assembly
//!
//! Gathers collaborator facts (catalog, mile ledger) into `BillingInputs`
//! and runs the pure calculation. Both the read-only preview endpoint and
//! the confirm path go through this service, always against fresh reads.

use std::sync::Arc;

use chrono::Datelike;
use tracing::{debug, instrument};

use core_kernel::TenantContext;
use domain_catalog::{CatalogPort, CourseItem};

use crate::discount::{validate_mile_spend, MileInfo, MileLedgerPort, MileSpend};
use crate::enrollment::additional_tickets;
use crate::error::BillingError;
use crate::preview::{calculate, BillingInputs, BillingPreview, EnrollmentRequest};
use crate::proration::weekday_from_iso;

/// Prices enrollments against the live catalog and ledger
pub struct BillingPreviewService {
    catalog: Arc<dyn CatalogPort>,
    ledger: Arc<dyn MileLedgerPort>,
}

impl BillingPreviewService {
    pub fn new(catalog: Arc<dyn CatalogPort>, ledger: Arc<dyn MileLedgerPort>) -> Self {
        Self { catalog, ledger }
    }

    /// Prices one enrollment request.
    ///
    /// # Errors
    ///
    /// - `Validation` for an out-of-range weekday or a textbook the course
    ///   does not offer
    /// - `NotFound` when the course or an extra product does not exist
    /// - mile-gate errors when `miles_to_use` violates the current ledger
    #[instrument(skip_all, fields(student = %request.student_id, course = %request.course_id))]
    pub async fn preview(
        &self,
        tenant: &TenantContext,
        request: &EnrollmentRequest,
    ) -> Result<BillingPreview, BillingError> {
        let inputs = self.assemble_inputs(tenant, request).await?;
        calculate(&inputs)
    }

    /// Resolves every collaborator fact the calculation needs.
    pub async fn assemble_inputs(
        &self,
        tenant: &TenantContext,
        request: &EnrollmentRequest,
    ) -> Result<BillingInputs, BillingError> {
        let weekly_day = weekday_from_iso(request.weekly_day_of_week).ok_or_else(|| {
            BillingError::validation(format!(
                "weekly_day_of_week must be 1..=7, got {}",
                request.weekly_day_of_week
            ))
        })?;

        let course = self.catalog.find_course(tenant, request.course_id).await?;

        let mut extra_items = Vec::with_capacity(request.extra_product_ids.len());
        for id in &request.extra_product_ids {
            let product = self.catalog.find_product(tenant, *id).await?;
            extra_items.push(CourseItem::single(product));
        }

        let ticket_count = additional_tickets(request.start_date.day());
        let mut enrollment_tuition_product = None;
        for course_id in course.member_course_ids() {
            if let Some(product) = self
                .catalog
                .find_enrollment_tuition_product(tenant, course_id, ticket_count)
                .await?
            {
                enrollment_tuition_product = Some(product);
                break;
            }
        }
        debug!(
            ticket_count,
            found_bundle = enrollment_tuition_product.is_some(),
            "resolved enrollment tuition bundle"
        );

        let balance = self.ledger.balance(tenant, request.guardian_id).await?;
        let eligible = self
            .ledger
            .can_use_miles(tenant, request.guardian_id)
            .await?;
        let mile_info = MileInfo::new(balance, eligible);

        let mile_spend = match request.miles_to_use {
            Some(miles) if miles > 0 => {
                validate_mile_spend(miles, &mile_info)?;
                let discount = self.ledger.discount_for(miles).await?;
                Some(MileSpend { miles, discount })
            }
            _ => None,
        };

        Ok(BillingInputs {
            tenant: *tenant,
            student_id: request.student_id,
            guardian_id: request.guardian_id,
            course,
            extra_items,
            start_date: request.start_date,
            weekly_day,
            enrollment_tuition_product,
            selected_textbook_ids: request.selected_textbook_ids.clone(),
            mile_info,
            mile_spend,
        })
    }
}
