//! Monthly tuition resolution
//!
//! The first full-price month after enrollment still uses new-enrollee
//! pricing; from the second full month onward the steady-state billing
//! table applies. Facility and monthly fees have no month tables and bill
//! at base price in both months.

use chrono::{Datelike, NaiveDate};

use domain_catalog::{resolve_price, CourseItem, ItemType, PriceTableKind};

use crate::line_item::LineItem;
use crate::proration::ProrationResult;

/// The calendar month immediately after the start date's month
pub fn first_full_month(start_date: NaiveDate) -> u32 {
    start_date.month() % 12 + 1
}

/// The month after `first_full_month`
pub fn second_full_month(start_date: NaiveDate) -> u32 {
    first_full_month(start_date) % 12 + 1
}

/// Full-price lines for one billing month.
///
/// Tuition resolves through the given table kind for `month`; facility and
/// monthly-fee items always bill at base price.
pub fn monthly_lines(
    items: &[&CourseItem],
    month: u32,
    tuition_table: PriceTableKind,
) -> Vec<LineItem> {
    items
        .iter()
        .filter_map(|item| match item.product.item_type {
            ItemType::Tuition => {
                let price = resolve_price(&item.product, month, tuition_table);
                Some(LineItem::priced(&item.product, price, item.quantity))
            }
            ItemType::Facility | ItemType::MonthlyFee => Some(LineItem::priced(
                &item.product,
                item.product.base_price,
                item.quantity,
            )),
            _ => None,
        })
        .collect()
}

/// Prorated partial-month lines for the month the student starts in.
///
/// Only meaningful when `proration.applies()`; tuition resolves through the
/// enrollment table for the start month (the student is a new enrollee in
/// that month), facility and monthly fees at base price, all scaled by the
/// proration ratio.
pub fn prorated_current_month_lines(
    items: &[&CourseItem],
    enrollment_month: u32,
    proration: &ProrationResult,
) -> Vec<LineItem> {
    items
        .iter()
        .filter_map(|item| {
            let price = match item.product.item_type {
                ItemType::Tuition => resolve_price(
                    &item.product,
                    enrollment_month,
                    PriceTableKind::Enrollment,
                ),
                ItemType::Facility | ItemType::MonthlyFee => item.product.base_price,
                _ => return None,
            };
            Some(LineItem::prorated(
                &item.product,
                price,
                item.quantity,
                proration.ratio,
                proration.note(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proration::prorate_start_month;
    use chrono::Weekday;
    use core_kernel::{Money, ProductId};
    use domain_catalog::PricedProduct;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_rollover() {
        assert_eq!(first_full_month(date(2026, 10, 15)), 11);
        assert_eq!(second_full_month(date(2026, 10, 15)), 12);

        assert_eq!(first_full_month(date(2026, 11, 3)), 12);
        assert_eq!(second_full_month(date(2026, 11, 3)), 1);

        assert_eq!(first_full_month(date(2026, 12, 28)), 1);
        assert_eq!(second_full_month(date(2026, 12, 28)), 2);
    }

    #[test]
    fn test_tuition_table_asymmetry() {
        let tuition = PricedProduct::new(
            ProductId::new(),
            "Weekly tuition",
            ItemType::Tuition,
            dec!(26000),
        )
        .with_price_override(PriceTableKind::Enrollment, 11, dec!(19800))
        .with_price_override(PriceTableKind::Billing, 12, dec!(27500));
        let items = [CourseItem::single(tuition)];
        let refs: Vec<&CourseItem> = items.iter().collect();

        let month1 = monthly_lines(&refs, 11, PriceTableKind::Enrollment);
        assert_eq!(month1[0].total_with_tax, Money::yen(21780));

        let month2 = monthly_lines(&refs, 12, PriceTableKind::Billing);
        assert_eq!(month2[0].total_with_tax, Money::yen(30250));
    }

    #[test]
    fn test_facility_and_monthly_fee_ignore_tables() {
        let facility = PricedProduct::new(
            ProductId::new(),
            "Facility fee",
            ItemType::Facility,
            dec!(2000),
        )
        .with_price_override(PriceTableKind::Enrollment, 11, dec!(100))
        .with_price_override(PriceTableKind::Billing, 11, dec!(100));
        let monthly = PricedProduct::new(
            ProductId::new(),
            "Monthly fee",
            ItemType::MonthlyFee,
            dec!(1000),
        );
        let items = [CourseItem::single(facility), CourseItem::single(monthly)];
        let refs: Vec<&CourseItem> = items.iter().collect();

        let lines = monthly_lines(&refs, 11, PriceTableKind::Enrollment);

        assert_eq!(lines[0].total_with_tax, Money::yen(2200));
        assert_eq!(lines[1].total_with_tax, Money::yen(1100));
    }

    #[test]
    fn test_one_offs_are_excluded_from_monthly_lines() {
        let enrollment = PricedProduct::new(
            ProductId::new(),
            "Enrollment fee",
            ItemType::Enrollment,
            dec!(11000),
        );
        let items = [CourseItem::single(enrollment)];
        let refs: Vec<&CourseItem> = items.iter().collect();

        assert!(monthly_lines(&refs, 5, PriceTableKind::Billing).is_empty());
    }

    #[test]
    fn test_prorated_lines_scale_and_note() {
        let tuition = PricedProduct::new(
            ProductId::new(),
            "Weekly tuition",
            ItemType::Tuition,
            dec!(26000),
        );
        let facility = PricedProduct::new(
            ProductId::new(),
            "Facility fee",
            ItemType::Facility,
            dec!(2000),
        );
        let items = [CourseItem::single(tuition), CourseItem::single(facility)];
        let refs: Vec<&CourseItem> = items.iter().collect();

        // 2026-01-15, Wednesdays -> 2/4 remaining
        let proration = prorate_start_month(date(2026, 1, 15), Weekday::Wed);
        let lines = prorated_current_month_lines(&refs, 1, &proration);

        assert_eq!(lines.len(), 2);
        // 26000 * 0.5 = 13000, tax 1300
        assert_eq!(lines[0].total_with_tax, Money::yen(14300));
        assert_eq!(lines[0].calculation_note.as_deref(), Some("2/4 weeks"));
        // 2000 * 0.5 = 1000, tax 100
        assert_eq!(lines[1].total_with_tax, Money::yen(1100));
    }
}
