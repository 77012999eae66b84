//! Effective price resolution
//!
//! Resolution is a total function: it never fails and never returns a
//! sentinel. A missing table override is the normal case, not an error, and
//! falls back to the product's base price.

use rust_decimal::Decimal;

use crate::product::{PriceTableKind, PricedProduct};

/// Resolves a product's effective tax-exclusive unit price for a month.
///
/// # Example
///
/// ```rust
/// use core_kernel::ProductId;
/// use domain_catalog::{resolve_price, ItemType, PriceTableKind, PricedProduct};
/// use rust_decimal_macros::dec;
///
/// let product = PricedProduct::new(ProductId::new(), "Tuition", ItemType::Tuition, dec!(26000))
///     .with_price_override(PriceTableKind::Enrollment, 4, dec!(19800));
///
/// assert_eq!(resolve_price(&product, 4, PriceTableKind::Enrollment), dec!(19800));
/// assert_eq!(resolve_price(&product, 5, PriceTableKind::Enrollment), dec!(26000));
/// ```
pub fn resolve_price(product: &PricedProduct, month: u32, kind: PriceTableKind) -> Decimal {
    match product.price_table.get(kind, month) {
        Some(price) => price,
        None => product.base_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ItemType;
    use core_kernel::ProductId;
    use rust_decimal_macros::dec;

    fn tuition() -> PricedProduct {
        PricedProduct::new(ProductId::new(), "Tuition", ItemType::Tuition, dec!(26000))
            .with_price_override(PriceTableKind::Enrollment, 11, dec!(19800))
            .with_price_override(PriceTableKind::Billing, 12, dec!(27500))
    }

    #[test]
    fn test_override_hit() {
        let p = tuition();
        assert_eq!(resolve_price(&p, 11, PriceTableKind::Enrollment), dec!(19800));
        assert_eq!(resolve_price(&p, 12, PriceTableKind::Billing), dec!(27500));
    }

    #[test]
    fn test_fallback_to_base_price() {
        let p = tuition();
        assert_eq!(resolve_price(&p, 12, PriceTableKind::Enrollment), dec!(26000));
        assert_eq!(resolve_price(&p, 11, PriceTableKind::Billing), dec!(26000));
    }

    #[test]
    fn test_out_of_range_month_falls_back() {
        let p = tuition();
        assert_eq!(resolve_price(&p, 0, PriceTableKind::Billing), dec!(26000));
        assert_eq!(resolve_price(&p, 13, PriceTableKind::Billing), dec!(26000));
    }
}
