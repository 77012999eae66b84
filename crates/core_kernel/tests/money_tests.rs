//! Tests for money arithmetic and the truncation billing rules

use core_kernel::{Currency, Money, MoneyError};
use rust_decimal_macros::dec;

#[test]
fn yen_has_no_decimal_places() {
    assert_eq!(Currency::JPY.decimal_places(), 0);
    assert_eq!(Currency::USD.decimal_places(), 2);
}

#[test]
fn display_formats_with_symbol() {
    assert_eq!(Money::yen(28600).to_string(), "¥28600");
}

#[test]
fn checked_ops_reject_mixed_currencies() {
    let a = Money::yen(100);
    let b = Money::new(dec!(1.00), Currency::USD);

    assert!(matches!(
        a.checked_add(&b),
        Err(MoneyError::CurrencyMismatch(_, _))
    ));
    assert!(matches!(
        a.checked_sub(&b),
        Err(MoneyError::CurrencyMismatch(_, _))
    ));
}

#[test]
fn including_tax_matches_manual_truncation() {
    // base 19800, 10% tax -> 1980 -> 21780
    let m = Money::yen(19800);
    assert_eq!(m.including_tax(dec!(0.10)), Money::yen(21780));

    // base 5555, 10% tax = 555.5 -> 555 -> 6110
    let m = Money::yen(5555);
    assert_eq!(m.tax_amount(dec!(0.10)), Money::yen(555));
    assert_eq!(m.including_tax(dec!(0.10)), Money::yen(6110));
}

#[test]
fn tax_on_zero_is_zero() {
    let zero = Money::zero(Currency::JPY);
    assert_eq!(zero.tax_amount(dec!(0.10)), zero);
    assert_eq!(zero.including_tax(dec!(0.10)), zero);
}

#[test]
fn prorate_half_of_odd_amount_truncates() {
    // 1111 * 0.5 = 555.5 -> 555
    assert_eq!(Money::yen(1111).prorate(dec!(0.5)), Money::yen(555));
}

#[test]
fn prorate_full_ratio_is_identity_on_whole_amounts() {
    let m = Money::yen(24200);
    assert_eq!(m.prorate(dec!(1)), m);
}

#[test]
fn negative_amounts_report_negative() {
    let m = Money::yen(100) - Money::yen(300);
    assert!(m.is_negative());
    assert_eq!(m.as_units(), -200);
}

#[test]
fn multiply_by_quantity() {
    let unit = Money::yen(3300);
    assert_eq!(unit.multiply(dec!(2)), Money::yen(6600));
}
