//! Enrollment-time charges
//!
//! Two independent rules live here: the ticket bucket, which decides how
//! many lesson-ticket bundles a mid-month enrollee buys, and the one-off
//! fee lines (enrollment fee, enrollment textbook, bag) charged at full
//! price regardless of proration.

use tracing::warn;

use core_kernel::ProductId;
use domain_catalog::{resolve_price, CourseItem, ItemType, PriceTableKind, PricedProduct};

use crate::line_item::LineItem;

/// How many ticket bundles a student starting on `day_of_month` needs.
///
/// A pure step function of the day alone; the weekly meeting day and the
/// month's length play no part.
pub fn additional_tickets(day_of_month: u32) -> u32 {
    match day_of_month {
        1..=10 => 3,
        11..=20 => 2,
        _ => 1,
    }
}

/// Prices the enrollment-tuition ticket bundle, if the catalog sells one.
///
/// The unit price resolves through the enrollment-month table. A course
/// with no bundle for this ticket count simply has no charge; that gap is
/// logged and the computation continues.
pub fn enrollment_tuition_line(
    product: Option<&PricedProduct>,
    enrollment_month: u32,
    ticket_count: u32,
) -> Option<LineItem> {
    match product {
        Some(product) => {
            let price = resolve_price(product, enrollment_month, PriceTableKind::Enrollment);
            Some(LineItem::priced(product, price, 1).with_note(format!("{ticket_count} tickets")))
        }
        None => {
            warn!(
                ticket_count,
                "no enrollment tuition product for ticket count, omitting charge"
            );
            None
        }
    }
}

/// Emits the one-off enrollment lines.
///
/// Enrollment-fee, enrollment-textbook, and bag items bill at full price,
/// untouched by proration. Selectable textbooks bill only when explicitly
/// chosen. When the catalog carries no enrollment-fee or enrollment-textbook
/// item, a ¥0 placeholder keeps the line-item shape stable for display.
pub fn enrollment_one_off_lines(
    items: &[&CourseItem],
    selected_textbook_ids: &[ProductId],
) -> Vec<LineItem> {
    let mut lines = Vec::new();

    for item in items {
        let item_type = item.product.item_type;
        if item_type.is_enrollment_one_off() {
            lines.push(LineItem::priced(
                &item.product,
                item.product.base_price,
                item.quantity,
            ));
        } else if item_type == ItemType::Textbook
            && selected_textbook_ids.contains(&item.product.id)
        {
            lines.push(LineItem::priced(
                &item.product,
                item.product.base_price,
                item.quantity,
            ));
        }
    }

    if !lines.iter().any(|l| l.category == ItemType::Enrollment) {
        lines.push(LineItem::placeholder(ItemType::Enrollment, "Enrollment fee"));
    }
    if !lines.iter().any(|l| l.category == ItemType::EnrollmentTextbook) {
        lines.push(LineItem::placeholder(
            ItemType::EnrollmentTextbook,
            "Enrollment textbook",
        ));
    }

    lines
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ticket_bucket_is_a_step_function(day in 1u32..=31) {
            let tickets = additional_tickets(day);
            let expected = if day <= 10 { 3 } else if day <= 20 { 2 } else { 1 };
            prop_assert_eq!(tickets, expected);
        }
    }
}
