//! The billing calculation
//!
//! One pure function turns fully-resolved inputs into a priced, itemized
//! preview. The read path shows the result; the confirm path re-runs the
//! same function on fresh inputs and persists what it returns, so the two
//! can never diverge.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use core_kernel::{
    CourseId, Currency, GuardianId, Money, ProductId, StudentId, TenantContext,
};
use domain_catalog::{CourseDefinition, CourseItem, PriceTableKind, PricedProduct};

use crate::discount::{validate_mile_spend, DiscountLine, MileInfo, MileSpend};
use crate::enrollment::{
    additional_tickets, enrollment_one_off_lines, enrollment_tuition_line,
};
use crate::error::BillingError;
use crate::line_item::{BillingGroup, GroupKey, LineItem};
use crate::proration::{prorate_start_month, ProrationResult};
use crate::tuition::{
    first_full_month, monthly_lines, prorated_current_month_lines, second_full_month,
};

/// What a caller asks to be priced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRequest {
    pub student_id: StudentId,
    pub guardian_id: GuardianId,
    pub course_id: CourseId,
    /// Ad-hoc extra products charged alongside the course items
    #[serde(default)]
    pub extra_product_ids: Vec<ProductId>,
    pub start_date: NaiveDate,
    /// ISO weekday: 1 = Monday .. 7 = Sunday
    pub weekly_day_of_week: u8,
    #[serde(default)]
    pub selected_textbook_ids: Vec<ProductId>,
    pub miles_to_use: Option<u32>,
}

/// Fully-resolved inputs for one calculation
///
/// Assembled by the preview service from collaborator reads; the
/// calculation itself performs no I/O.
#[derive(Debug, Clone)]
pub struct BillingInputs {
    pub tenant: TenantContext,
    pub student_id: StudentId,
    pub guardian_id: GuardianId,
    pub course: CourseDefinition,
    pub extra_items: Vec<CourseItem>,
    pub start_date: NaiveDate,
    pub weekly_day: Weekday,
    pub enrollment_tuition_product: Option<PricedProduct>,
    pub selected_textbook_ids: Vec<ProductId>,
    pub mile_info: MileInfo,
    pub mile_spend: Option<MileSpend>,
}

/// The priced, itemized result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingPreview {
    /// Groups in fixed order: Enrollment, CurrentMonth (when prorated),
    /// Month1, Month2
    pub groups: Vec<BillingGroup>,
    pub proration: ProrationResult,
    pub enrollment_month: u32,
    pub month1: u32,
    pub month2: u32,
    pub ticket_count: u32,
    /// Ticket-bundle charge, kept outside the groups
    pub enrollment_tuition_item: Option<LineItem>,
    /// Selectable textbooks, never part of the automatic totals
    pub textbook_options: Vec<LineItem>,
    pub discounts: Vec<DiscountLine>,
    pub discount_total: Money,
    /// Group subtotals plus the ticket-bundle charge
    pub subtotal: Money,
    /// `subtotal - discount_total`, never negative
    pub grand_total: Money,
    pub mile_info: MileInfo,
}

impl BillingPreview {
    pub fn group(&self, key: GroupKey) -> Option<&BillingGroup> {
        self.groups.iter().find(|g| g.key == key)
    }
}

/// Prices one enrollment.
///
/// # Errors
///
/// - `Validation` when a selected textbook is not offered by the course
/// - mile-gate errors when `mile_spend` violates the ledger snapshot
/// - `NegativeTotal` when the discount exceeds the charges; upstream inputs
///   must be fixed, this function never clamps
pub fn calculate(inputs: &BillingInputs) -> Result<BillingPreview, BillingError> {
    for id in &inputs.selected_textbook_ids {
        let offered = inputs.course.offers_product(*id)
            || inputs.extra_items.iter().any(|item| item.product.id == *id);
        if !offered {
            return Err(BillingError::validation(format!(
                "selected textbook {id} is not offered by course {}",
                inputs.course.id()
            )));
        }
    }
    if let Some(spend) = &inputs.mile_spend {
        validate_mile_spend(spend.miles, &inputs.mile_info)?;
    }

    let proration = prorate_start_month(inputs.start_date, inputs.weekly_day);
    let enrollment_month = inputs.start_date.month();
    let ticket_count = additional_tickets(inputs.start_date.day());
    let month1 = first_full_month(inputs.start_date);
    let month2 = second_full_month(inputs.start_date);

    let mut all_items: Vec<&CourseItem> = inputs.course.items();
    all_items.extend(inputs.extra_items.iter());

    let enrollment_group = BillingGroup::new(
        GroupKey::Enrollment,
        None,
        enrollment_one_off_lines(&all_items, &inputs.selected_textbook_ids),
    );

    let enrollment_tuition_item = enrollment_tuition_line(
        inputs.enrollment_tuition_product.as_ref(),
        enrollment_month,
        ticket_count,
    );

    let mut groups = vec![enrollment_group];
    if proration.applies() {
        groups.push(BillingGroup::new(
            GroupKey::CurrentMonth,
            Some(enrollment_month),
            prorated_current_month_lines(&all_items, enrollment_month, &proration),
        ));
    }
    groups.push(BillingGroup::new(
        GroupKey::Month1,
        Some(month1),
        monthly_lines(&all_items, month1, PriceTableKind::Enrollment),
    ));
    groups.push(BillingGroup::new(
        GroupKey::Month2,
        Some(month2),
        monthly_lines(&all_items, month2, PriceTableKind::Billing),
    ));

    let textbook_options = inputs
        .course
        .textbook_options()
        .into_iter()
        .map(|item| LineItem::priced(&item.product, item.product.base_price, item.quantity))
        .collect();

    let zero = Money::zero(Currency::JPY);
    let mut subtotal = groups
        .iter()
        .fold(zero, |acc, group| acc + group.subtotal_with_tax());
    if let Some(item) = &enrollment_tuition_item {
        subtotal = subtotal + item.total_with_tax;
    }

    let discounts: Vec<DiscountLine> = inputs
        .mile_spend
        .as_ref()
        .map(|spend| vec![DiscountLine::from_spend(spend)])
        .unwrap_or_default();
    let discount_total = discounts.iter().fold(zero, |acc, d| acc + d.amount);

    let grand_total = subtotal - discount_total;
    if grand_total.is_negative() {
        return Err(BillingError::NegativeTotal(grand_total.as_units()));
    }

    Ok(BillingPreview {
        groups,
        proration,
        enrollment_month,
        month1,
        month2,
        ticket_count,
        enrollment_tuition_item,
        textbook_options,
        discounts,
        discount_total,
        subtotal,
        grand_total,
        mile_info: inputs.mile_info,
    })
}
