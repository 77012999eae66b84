//! Priced products and month-indexed price tables
//!
//! A product's effective price can differ by calendar month, and differs
//! again between the month a student enrolls in and later steady-state
//! billing months. Both tables are optional per month; the base price is
//! always present.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use core_kernel::ProductId;

use crate::error::CatalogError;

/// Default consumption tax rate applied when the catalog does not override it
pub fn default_tax_rate() -> Decimal {
    dec!(0.10)
}

/// What a product is billed as
///
/// Every consumer matches on this exhaustively; adding a variant forces each
/// switch to be revisited at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Recurring monthly tuition
    Tuition,
    /// Recurring facility usage fee
    Facility,
    /// Recurring administrative monthly fee
    MonthlyFee,
    /// One-time enrollment fee
    Enrollment,
    /// One-time textbook bundled at enrollment
    EnrollmentTextbook,
    /// Partial-month tuition sold as ticket bundles at enrollment
    EnrollmentTuition,
    /// Selectable textbook
    Textbook,
    /// School bag
    Bag,
    /// Anything else
    Other,
}

impl ItemType {
    /// Returns the snake_case name used in storage and wire formats
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Tuition => "tuition",
            ItemType::Facility => "facility",
            ItemType::MonthlyFee => "monthly_fee",
            ItemType::Enrollment => "enrollment",
            ItemType::EnrollmentTextbook => "enrollment_textbook",
            ItemType::EnrollmentTuition => "enrollment_tuition",
            ItemType::Textbook => "textbook",
            ItemType::Bag => "bag",
            ItemType::Other => "other",
        }
    }

    /// True for items charged once at enrollment, unmodified by proration
    pub fn is_enrollment_one_off(&self) -> bool {
        matches!(
            self,
            ItemType::Enrollment | ItemType::EnrollmentTextbook | ItemType::Bag
        )
    }

    /// True for items billed every month (tuition, facility, monthly fee)
    pub fn is_recurring(&self) -> bool {
        matches!(
            self,
            ItemType::Tuition | ItemType::Facility | ItemType::MonthlyFee
        )
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tuition" => Ok(ItemType::Tuition),
            "facility" => Ok(ItemType::Facility),
            "monthly_fee" => Ok(ItemType::MonthlyFee),
            "enrollment" => Ok(ItemType::Enrollment),
            "enrollment_textbook" => Ok(ItemType::EnrollmentTextbook),
            "enrollment_tuition" => Ok(ItemType::EnrollmentTuition),
            "textbook" => Ok(ItemType::Textbook),
            "bag" => Ok(ItemType::Bag),
            "other" => Ok(ItemType::Other),
            _ => Err(CatalogError::UnknownItemType(s.to_string())),
        }
    }
}

/// Which price table a lookup reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTableKind {
    /// New-enrollee pricing for the month a student joins in
    Enrollment,
    /// Steady-state pricing for later billing months
    Billing,
}

/// Month-indexed price overrides, split by table kind
///
/// Keys are calendar month numbers 1..=12. A missing entry means the base
/// price applies for that month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    enrollment: BTreeMap<u32, Decimal>,
    billing: BTreeMap<u32, Decimal>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an override price for a month
    pub fn set(&mut self, kind: PriceTableKind, month: u32, price: Decimal) {
        match kind {
            PriceTableKind::Enrollment => self.enrollment.insert(month, price),
            PriceTableKind::Billing => self.billing.insert(month, price),
        };
    }

    /// Returns the override price for a month, if one is defined
    pub fn get(&self, kind: PriceTableKind, month: u32) -> Option<Decimal> {
        match kind {
            PriceTableKind::Enrollment => self.enrollment.get(&month).copied(),
            PriceTableKind::Billing => self.billing.get(&month).copied(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.enrollment.is_empty() && self.billing.is_empty()
    }
}

/// Immutable catalog entry with pricing data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedProduct {
    /// Unique identifier
    pub id: ProductId,
    /// Name shown on line items
    pub display_name: String,
    /// Billing category
    pub item_type: ItemType,
    /// Tax-exclusive unit price used when no table override applies
    pub base_price: Decimal,
    /// Consumption tax rate (e.g. 0.10)
    pub tax_rate: Decimal,
    /// Optional month-indexed override prices
    pub price_table: PriceTable,
}

impl PricedProduct {
    /// Creates a product with the default tax rate and no price table
    pub fn new(
        id: ProductId,
        display_name: impl Into<String>,
        item_type: ItemType,
        base_price: Decimal,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            item_type,
            base_price,
            tax_rate: default_tax_rate(),
            price_table: PriceTable::new(),
        }
    }

    /// Overrides the tax rate
    pub fn with_tax_rate(mut self, rate: Decimal) -> Self {
        self.tax_rate = rate;
        self
    }

    /// Adds a month override price
    pub fn with_price_override(
        mut self,
        kind: PriceTableKind,
        month: u32,
        price: Decimal,
    ) -> Self {
        self.price_table.set(kind, month, price);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_round_trips_through_str() {
        for item_type in [
            ItemType::Tuition,
            ItemType::Facility,
            ItemType::MonthlyFee,
            ItemType::Enrollment,
            ItemType::EnrollmentTextbook,
            ItemType::EnrollmentTuition,
            ItemType::Textbook,
            ItemType::Bag,
            ItemType::Other,
        ] {
            let parsed: ItemType = item_type.as_str().parse().unwrap();
            assert_eq!(parsed, item_type);
        }
    }

    #[test]
    fn test_unknown_item_type_is_rejected() {
        let result: Result<ItemType, _> = "premium".parse();
        assert!(matches!(result, Err(CatalogError::UnknownItemType(_))));
    }

    #[test]
    fn test_price_table_kinds_are_independent() {
        let mut table = PriceTable::new();
        table.set(PriceTableKind::Enrollment, 4, dec!(9800));

        assert_eq!(table.get(PriceTableKind::Enrollment, 4), Some(dec!(9800)));
        assert_eq!(table.get(PriceTableKind::Billing, 4), None);
    }

    #[test]
    fn test_product_defaults() {
        let product = PricedProduct::new(
            ProductId::new(),
            "Weekly tuition",
            ItemType::Tuition,
            dec!(26000),
        );

        assert_eq!(product.tax_rate, dec!(0.10));
        assert!(product.price_table.is_empty());
    }
}
