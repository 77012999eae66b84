//! First-month proration
//!
//! A student who starts mid-month only attends the remaining weekly
//! sessions of that month. Proration counts that weekday's occurrences in
//! the start month and compares how many are still ahead of the start date.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of counting weekday occurrences in the start month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProrationResult {
    /// Occurrences on or after the start date
    pub remaining_count: u32,
    /// All occurrences in the start month
    pub total_count: u32,
    /// `remaining_count / total_count`, 0 when the weekday never occurs
    pub ratio: Decimal,
    /// The remaining dates, in order; `remaining_count` long
    pub matched_dates: Vec<NaiveDate>,
}

impl ProrationResult {
    /// True when a reduced partial-month charge applies.
    ///
    /// `ratio >= 1` means the student starts on or before the first
    /// occurrence and pays the full month; `total_count == 0` means the
    /// weekday never occurs this month and proration is skipped entirely.
    pub fn applies(&self) -> bool {
        self.total_count > 0 && self.ratio < Decimal::ONE
    }

    /// Human-readable derivation, e.g. "3/4 weeks"
    pub fn note(&self) -> String {
        format!("{}/{} weeks", self.remaining_count, self.total_count)
    }
}

/// Converts an ISO weekday number (1 = Monday .. 7 = Sunday)
pub fn weekday_from_iso(n: u8) -> Option<Weekday> {
    match n {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Counts the weekly meeting day's occurrences in the start month.
///
/// # Example
///
/// ```rust
/// use chrono::{NaiveDate, Weekday};
/// use domain_billing::prorate_start_month;
/// use rust_decimal_macros::dec;
///
/// // Wednesdays in January 2026: 7, 14, 21, 28
/// let start = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let result = prorate_start_month(start, Weekday::Wed);
///
/// assert_eq!(result.total_count, 4);
/// assert_eq!(result.remaining_count, 2);
/// assert_eq!(result.ratio, dec!(0.5));
/// ```
pub fn prorate_start_month(start_date: NaiveDate, weekly_day: Weekday) -> ProrationResult {
    let month = start_date.month();
    let month_start = start_date
        .with_day(1)
        .expect("first of the month is always a valid date");

    let occurrences: Vec<NaiveDate> = month_start
        .iter_days()
        .take_while(|d| d.month() == month)
        .filter(|d| d.weekday() == weekly_day)
        .collect();

    let total_count = occurrences.len() as u32;
    let matched_dates: Vec<NaiveDate> = occurrences
        .into_iter()
        .filter(|d| *d >= start_date)
        .collect();
    let remaining_count = matched_dates.len() as u32;

    let ratio = if total_count == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(remaining_count) / Decimal::from(total_count)
    };

    ProrationResult {
        remaining_count,
        total_count,
        ratio,
        matched_dates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_start_on_first_occurrence_is_full_month() {
        // 2026-01-07 is the first Wednesday of January 2026
        let result = prorate_start_month(date(2026, 1, 7), Weekday::Wed);

        assert_eq!(result.total_count, 4);
        assert_eq!(result.remaining_count, 4);
        assert_eq!(result.ratio, dec!(1));
        assert!(!result.applies());
    }

    #[test]
    fn test_mid_month_start_halves_the_ratio() {
        let result = prorate_start_month(date(2026, 1, 15), Weekday::Wed);

        assert_eq!(result.total_count, 4);
        assert_eq!(result.remaining_count, 2);
        assert_eq!(result.ratio, dec!(0.5));
        assert_eq!(
            result.matched_dates,
            vec![date(2026, 1, 21), date(2026, 1, 28)]
        );
        assert!(result.applies());
        assert_eq!(result.note(), "2/4 weeks");
    }

    #[test]
    fn test_first_of_month_still_yields_full_ratio() {
        let result = prorate_start_month(date(2026, 6, 1), Weekday::Wed);

        assert_eq!(result.ratio, dec!(1));
        assert!(!result.applies());
    }

    #[test]
    fn test_start_after_last_occurrence_is_zero() {
        // Last Wednesday of January 2026 is the 28th
        let result = prorate_start_month(date(2026, 1, 29), Weekday::Wed);

        assert_eq!(result.total_count, 4);
        assert_eq!(result.remaining_count, 0);
        assert_eq!(result.ratio, dec!(0));
        assert!(result.matched_dates.is_empty());
        // ratio < 1 with zero remaining sessions still prorates (to zero)
        assert!(result.applies());
    }

    #[test]
    fn test_five_occurrence_month() {
        // January 2026 has five Thursdays: 1, 8, 15, 22, 29
        let result = prorate_start_month(date(2026, 1, 9), Weekday::Thu);

        assert_eq!(result.total_count, 5);
        assert_eq!(result.remaining_count, 3);
        assert_eq!(result.ratio, dec!(0.6));
    }

    #[test]
    fn test_weekday_from_iso() {
        assert_eq!(weekday_from_iso(1), Some(Weekday::Mon));
        assert_eq!(weekday_from_iso(3), Some(Weekday::Wed));
        assert_eq!(weekday_from_iso(7), Some(Weekday::Sun));
        assert_eq!(weekday_from_iso(0), None);
        assert_eq!(weekday_from_iso(8), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (2020i32..2032, 1u32..=12, 1u32..=31).prop_filter_map("valid date", |(y, m, d)| {
            NaiveDate::from_ymd_opt(y, m, d)
        })
    }

    fn arb_weekday() -> impl Strategy<Value = Weekday> {
        (1u8..=7).prop_map(|n| weekday_from_iso(n).unwrap())
    }

    proptest! {
        #[test]
        fn ratio_is_always_in_unit_interval(start in arb_date(), day in arb_weekday()) {
            let result = prorate_start_month(start, day);

            prop_assert!(result.ratio >= Decimal::ZERO);
            prop_assert!(result.ratio <= Decimal::ONE);
            prop_assert!(result.remaining_count <= result.total_count);
            prop_assert_eq!(result.matched_dates.len() as u32, result.remaining_count);
        }

        #[test]
        fn matched_dates_are_ordered_and_on_the_weekday(start in arb_date(), day in arb_weekday()) {
            let result = prorate_start_month(start, day);

            for window in result.matched_dates.windows(2) {
                prop_assert!(window[0] < window[1]);
            }
            for d in &result.matched_dates {
                prop_assert_eq!(d.weekday(), day);
                prop_assert!(*d >= start);
                prop_assert_eq!(d.month(), start.month());
            }
        }

        #[test]
        fn ratio_is_one_when_starting_on_or_before_first_occurrence(
            start in arb_date(),
            day in arb_weekday()
        ) {
            let result = prorate_start_month(start, day);
            if let Some(first) = result.matched_dates.first() {
                if result.remaining_count == result.total_count {
                    prop_assert!(*first >= start);
                    prop_assert_eq!(result.ratio, Decimal::ONE);
                }
            }
        }
    }
}
