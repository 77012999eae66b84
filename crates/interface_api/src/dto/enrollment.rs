//! Enrollment DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_billing::{
    BillingGroup, BillingPreview, ConfirmedOrder, DiscountLine, EnrollmentRequest, GroupKey,
    LineItem, MileInfo, PaymentMethod,
};

#[derive(Debug, Deserialize)]
pub struct PreviewRequestDto {
    pub student_id: Uuid,
    pub guardian_id: Uuid,
    pub course_id: Uuid,
    #[serde(default)]
    pub product_ids: Vec<Uuid>,
    pub start_date: NaiveDate,
    /// ISO weekday: 1 = Monday .. 7 = Sunday
    pub day_of_week: u8,
    #[serde(default)]
    pub selected_textbook_ids: Vec<Uuid>,
    pub miles_to_use: Option<u32>,
}

impl PreviewRequestDto {
    pub fn into_domain(self) -> EnrollmentRequest {
        EnrollmentRequest {
            student_id: self.student_id.into(),
            guardian_id: self.guardian_id.into(),
            course_id: self.course_id.into(),
            extra_product_ids: self.product_ids.into_iter().map(Into::into).collect(),
            start_date: self.start_date,
            weekly_day_of_week: self.day_of_week,
            selected_textbook_ids: self
                .selected_textbook_ids
                .into_iter()
                .map(Into::into)
                .collect(),
            miles_to_use: self.miles_to_use,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequestDto {
    #[serde(flatten)]
    pub enrollment: PreviewRequestDto,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub schedule_ids: Vec<Uuid>,
}

impl ConfirmRequestDto {
    pub fn into_domain(self) -> domain_billing::ConfirmRequest {
        domain_billing::ConfirmRequest {
            enrollment: self.enrollment.into_domain(),
            payment_method: self.payment_method,
            schedule_ids: self.schedule_ids.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LineItemDto {
    pub product_id: Option<Uuid>,
    pub display_name: String,
    pub category: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub tax_amount: i64,
    pub price_with_tax: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation_note: Option<String>,
}

impl From<&LineItem> for LineItemDto {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.product_id.map(Into::into),
            display_name: item.display_name.clone(),
            category: item.category.as_str().to_string(),
            unit_price: item.unit_price.amount(),
            quantity: item.quantity,
            tax_amount: item.tax_amount.as_units(),
            price_with_tax: item.total_with_tax.as_units(),
            calculation_note: item.calculation_note.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BillingGroupDto {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_number: Option<u32>,
    pub items: Vec<LineItemDto>,
    pub subtotal_with_tax: i64,
}

impl From<&BillingGroup> for BillingGroupDto {
    fn from(group: &BillingGroup) -> Self {
        Self {
            key: group.key.as_str().to_string(),
            label: group.label.clone(),
            month_number: group.month_number,
            items: group.items.iter().map(LineItemDto::from).collect(),
            subtotal_with_tax: group.subtotal_with_tax().as_units(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DiscountDto {
    pub name: String,
    pub miles: u32,
    pub amount: i64,
}

impl From<&DiscountLine> for DiscountDto {
    fn from(discount: &DiscountLine) -> Self {
        Self {
            name: discount.name.clone(),
            miles: discount.miles,
            amount: discount.amount.as_units(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MileInfoDto {
    pub balance: u32,
    pub eligible: bool,
    pub minimum_spend: u32,
}

impl From<&MileInfo> for MileInfoDto {
    fn from(info: &MileInfo) -> Self {
        Self {
            balance: info.balance,
            eligible: info.eligible,
            minimum_spend: info.minimum_spend,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MonthlyTuitionDto {
    pub month1: u32,
    pub month2: u32,
    pub month1_total: i64,
    pub month2_total: i64,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponseDto {
    /// Every charged line, across all groups
    pub items: Vec<LineItemDto>,
    pub subtotal: i64,
    pub discounts: Vec<DiscountDto>,
    pub discount_total: i64,
    pub grand_total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_tuition: Option<LineItemDto>,
    /// One-off enrollment charges (fees, materials, bag)
    pub additional_fees: Vec<LineItemDto>,
    pub monthly_tuition: MonthlyTuitionDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_month_prorated: Option<BillingGroupDto>,
    /// Recurring course charges at first-full-month prices
    pub course_items: Vec<LineItemDto>,
    pub billing_by_month: Vec<BillingGroupDto>,
    pub mile_info: MileInfoDto,
    /// Selectable textbooks, excluded from the totals
    pub textbook_options: Vec<LineItemDto>,
}

impl From<&BillingPreview> for PreviewResponseDto {
    fn from(preview: &BillingPreview) -> Self {
        let items = preview
            .groups
            .iter()
            .flat_map(|g| g.items.iter())
            .chain(preview.enrollment_tuition_item.iter())
            .map(LineItemDto::from)
            .collect();

        let additional_fees = preview
            .group(GroupKey::Enrollment)
            .map(|g| g.items.iter().map(LineItemDto::from).collect())
            .unwrap_or_default();

        let course_items = preview
            .group(GroupKey::Month1)
            .map(|g| g.items.iter().map(LineItemDto::from).collect())
            .unwrap_or_default();

        let monthly_tuition = MonthlyTuitionDto {
            month1: preview.month1,
            month2: preview.month2,
            month1_total: preview
                .group(GroupKey::Month1)
                .map(|g| g.subtotal_with_tax().as_units())
                .unwrap_or(0),
            month2_total: preview
                .group(GroupKey::Month2)
                .map(|g| g.subtotal_with_tax().as_units())
                .unwrap_or(0),
        };

        Self {
            items,
            subtotal: preview.subtotal.as_units(),
            discounts: preview.discounts.iter().map(DiscountDto::from).collect(),
            discount_total: preview.discount_total.as_units(),
            grand_total: preview.grand_total.as_units(),
            enrollment_tuition: preview.enrollment_tuition_item.as_ref().map(LineItemDto::from),
            additional_fees,
            monthly_tuition,
            current_month_prorated: preview
                .group(GroupKey::CurrentMonth)
                .map(BillingGroupDto::from),
            course_items,
            billing_by_month: preview.groups.iter().map(BillingGroupDto::from).collect(),
            mile_info: MileInfoDto::from(&preview.mile_info),
            textbook_options: preview
                .textbook_options
                .iter()
                .map(LineItemDto::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponseDto {
    pub order_id: Uuid,
    pub status: String,
    pub mile_discount: i64,
    pub miles_used: u32,
}

impl From<&ConfirmedOrder> for ConfirmResponseDto {
    fn from(order: &ConfirmedOrder) -> Self {
        Self {
            order_id: *order.order_id.as_uuid(),
            status: order.status.as_str().to_string(),
            mile_discount: order.mile_discount.as_units(),
            miles_used: order.miles_used,
        }
    }
}
