//! Line items and billing groups
//!
//! Every charge the engine produces is a `LineItem`; items are presented in
//! `BillingGroup`s keyed by when the charge is due.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{Currency, Money, ProductId};
use domain_catalog::{ItemType, PricedProduct};

/// A single priced charge
///
/// `unit_price` is tax-exclusive; `total_with_tax` is the billed amount for
/// the full quantity after truncated tax. Placeholder lines carry no product
/// id and zero amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: Option<ProductId>,
    pub display_name: String,
    pub category: ItemType,
    pub unit_price: Money,
    pub quantity: u32,
    pub tax_amount: Money,
    pub total_with_tax: Money,
    pub calculation_note: Option<String>,
}

impl LineItem {
    /// Creates a full-price line for a product at a resolved unit price.
    ///
    /// The pre-tax base is truncated to whole units before tax is applied,
    /// and the tax itself is truncated toward zero.
    pub fn priced(product: &PricedProduct, unit_price: Decimal, quantity: u32) -> Self {
        let unit = Money::new(unit_price, Currency::JPY);
        let base = unit.multiply(Decimal::from(quantity)).truncate_to_unit();
        let tax = base.tax_amount(product.tax_rate);

        Self {
            product_id: Some(product.id),
            display_name: product.display_name.clone(),
            category: product.item_type,
            unit_price: unit,
            quantity,
            tax_amount: tax,
            total_with_tax: base + tax,
            calculation_note: None,
        }
    }

    /// Creates a prorated line: the pre-tax base is scaled by `ratio` and
    /// truncated before tax is applied.
    pub fn prorated(
        product: &PricedProduct,
        unit_price: Decimal,
        quantity: u32,
        ratio: Decimal,
        note: impl Into<String>,
    ) -> Self {
        let unit = Money::new(unit_price, Currency::JPY);
        let base = unit.multiply(Decimal::from(quantity)).prorate(ratio);
        let tax = base.tax_amount(product.tax_rate);

        Self {
            product_id: Some(product.id),
            display_name: product.display_name.clone(),
            category: product.item_type,
            unit_price: unit,
            quantity,
            tax_amount: tax,
            total_with_tax: base + tax,
            calculation_note: Some(note.into()),
        }
    }

    /// Creates a ¥0 placeholder so downstream display always sees the
    /// category even when the catalog carries no such item.
    pub fn placeholder(category: ItemType, display_name: impl Into<String>) -> Self {
        let zero = Money::zero(Currency::JPY);
        Self {
            product_id: None,
            display_name: display_name.into(),
            category,
            unit_price: zero,
            quantity: 1,
            tax_amount: zero,
            total_with_tax: zero,
            calculation_note: None,
        }
    }

    /// Attaches a derivation note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.calculation_note = Some(note.into());
        self
    }

    pub fn is_placeholder(&self) -> bool {
        self.product_id.is_none() && self.total_with_tax.is_zero()
    }
}

/// When a group of charges falls due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    /// One-time charges collected at enrollment
    Enrollment,
    /// Partial charges for the month the student starts in
    CurrentMonth,
    /// The first full-price month after enrollment
    Month1,
    /// The second full-price month
    Month2,
}

impl GroupKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKey::Enrollment => "enrollment",
            GroupKey::CurrentMonth => "current_month",
            GroupKey::Month1 => "month_1",
            GroupKey::Month2 => "month_2",
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An ordered bucket of line items due at the same time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingGroup {
    pub key: GroupKey,
    pub label: String,
    /// Calendar month the charges are for; None for enrollment-time charges
    pub month_number: Option<u32>,
    pub items: Vec<LineItem>,
}

impl BillingGroup {
    pub fn new(key: GroupKey, month_number: Option<u32>, items: Vec<LineItem>) -> Self {
        let label = match (key, month_number) {
            (GroupKey::Enrollment, _) => "At enrollment".to_string(),
            (GroupKey::CurrentMonth, Some(m)) => format!("Starting month (month {m})"),
            (GroupKey::Month1, Some(m)) => format!("First full month (month {m})"),
            (GroupKey::Month2, Some(m)) => format!("Second full month (month {m})"),
            (key, None) => key.to_string(),
        };
        Self {
            key,
            label,
            month_number,
            items,
        }
    }

    /// Sum of all item totals, tax included
    pub fn subtotal_with_tax(&self) -> Money {
        self.items
            .iter()
            .fold(Money::zero(Currency::JPY), |acc, item| {
                acc + item.total_with_tax
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_catalog::ItemType;
    use rust_decimal_macros::dec;

    fn product(price: Decimal) -> PricedProduct {
        PricedProduct::new(ProductId::new(), "Weekly tuition", ItemType::Tuition, price)
    }

    #[test]
    fn test_priced_line_truncates_tax() {
        // 5555 * 0.10 = 555.5 -> 555
        let line = LineItem::priced(&product(dec!(5555)), dec!(5555), 1);

        assert_eq!(line.tax_amount, Money::yen(555));
        assert_eq!(line.total_with_tax, Money::yen(6110));
    }

    #[test]
    fn test_quantity_multiplies_before_tax() {
        let line = LineItem::priced(&product(dec!(1000)), dec!(1000), 3);

        assert_eq!(line.quantity, 3);
        assert_eq!(line.tax_amount, Money::yen(300));
        assert_eq!(line.total_with_tax, Money::yen(3300));
    }

    #[test]
    fn test_prorated_line_truncates_base_before_tax() {
        // 26000 * 3/4 = 19500; tax 1950
        let ratio = dec!(3) / dec!(4);
        let line = LineItem::prorated(&product(dec!(26000)), dec!(26000), 1, ratio, "3/4 weeks");

        assert_eq!(line.total_with_tax, Money::yen(21450));
        assert_eq!(line.calculation_note.as_deref(), Some("3/4 weeks"));
    }

    #[test]
    fn test_placeholder_is_zero() {
        let line = LineItem::placeholder(ItemType::Enrollment, "Enrollment fee");

        assert!(line.is_placeholder());
        assert!(line.total_with_tax.is_zero());
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_group_subtotal_sums_items() {
        let group = BillingGroup::new(
            GroupKey::Month1,
            Some(2),
            vec![
                LineItem::priced(&product(dec!(10000)), dec!(10000), 1),
                LineItem::priced(&product(dec!(2000)), dec!(2000), 1),
            ],
        );

        assert_eq!(group.subtotal_with_tax(), Money::yen(13200));
        assert_eq!(group.label, "First full month (month 2)");
    }
}
