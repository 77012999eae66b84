//! Tests for the billing calculation and its invariants

use chrono::{NaiveDate, Weekday};
use rust_decimal_macros::dec;

use core_kernel::{
    BrandId, CourseId, Currency, GuardianId, Money, ProductId, SchoolId, StudentId, TenantContext,
};
use domain_catalog::{
    Course, CourseDefinition, CourseItem, ItemType, PriceTableKind, PricedProduct,
};
use domain_billing::{
    calculate, BillingError, BillingInputs, GroupKey, MileInfo, MileSpend,
};

fn tenant() -> TenantContext {
    TenantContext::new(BrandId::new(), SchoolId::new())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn product(name: &str, item_type: ItemType, price: rust_decimal::Decimal) -> PricedProduct {
    PricedProduct::new(ProductId::new(), name, item_type, price)
}

/// A course with tuition 26000, facility 2000, monthly fee 1000,
/// enrollment fee 11000, and one selectable textbook at 1500.
fn standard_course() -> CourseDefinition {
    CourseDefinition::Course(Course::new(
        CourseId::new(),
        "Weekly math",
        vec![
            CourseItem::single(product("Weekly tuition", ItemType::Tuition, dec!(26000))),
            CourseItem::single(product("Facility fee", ItemType::Facility, dec!(2000))),
            CourseItem::single(product("Monthly fee", ItemType::MonthlyFee, dec!(1000))),
            CourseItem::single(product("Enrollment fee", ItemType::Enrollment, dec!(11000))),
            CourseItem::single(product("Grammar book", ItemType::Textbook, dec!(1500))),
        ],
    ))
}

fn inputs(course: CourseDefinition, start: NaiveDate, weekly_day: Weekday) -> BillingInputs {
    BillingInputs {
        tenant: tenant(),
        student_id: StudentId::new(),
        guardian_id: GuardianId::new(),
        course,
        extra_items: vec![],
        start_date: start,
        weekly_day,
        enrollment_tuition_product: None,
        selected_textbook_ids: vec![],
        mile_info: MileInfo::new(0, false),
        mile_spend: None,
    }
}

fn grand_total_closes(preview: &domain_billing::BillingPreview) -> bool {
    let mut expected = preview
        .groups
        .iter()
        .fold(Money::zero(Currency::JPY), |acc, g| {
            acc + g.subtotal_with_tax()
        });
    if let Some(item) = &preview.enrollment_tuition_item {
        expected = expected + item.total_with_tax;
    }
    expected - preview.discount_total == preview.grand_total
}

#[test]
fn start_on_first_weekday_skips_current_month_group() {
    // 2026-01-07 is the first Wednesday of the month: full ratio, 3 tickets
    let preview = calculate(&inputs(standard_course(), date(2026, 1, 7), Weekday::Wed)).unwrap();

    assert_eq!(preview.proration.total_count, 4);
    assert_eq!(preview.proration.remaining_count, 4);
    assert_eq!(preview.proration.ratio, dec!(1));
    assert_eq!(preview.ticket_count, 3);
    assert!(preview.group(GroupKey::CurrentMonth).is_none());

    let keys: Vec<GroupKey> = preview.groups.iter().map(|g| g.key).collect();
    assert_eq!(keys, vec![GroupKey::Enrollment, GroupKey::Month1, GroupKey::Month2]);
    assert!(grand_total_closes(&preview));
}

#[test]
fn mid_month_start_prorates_current_month() {
    // 2026-01-15, Wednesdays -> 2 of 4 remaining, 2 tickets
    let preview = calculate(&inputs(standard_course(), date(2026, 1, 15), Weekday::Wed)).unwrap();

    assert_eq!(preview.proration.ratio, dec!(0.5));
    assert_eq!(preview.ticket_count, 2);

    let current = preview.group(GroupKey::CurrentMonth).unwrap();
    assert_eq!(current.month_number, Some(1));
    // tuition 26000*0.5=13000 +tax -> 14300; facility 1000 -> 1100; monthly 500 -> 550
    assert_eq!(current.subtotal_with_tax(), Money::yen(14300 + 1100 + 550));
    assert!(current
        .items
        .iter()
        .all(|i| i.calculation_note.as_deref() == Some("2/4 weeks")));

    let keys: Vec<GroupKey> = preview.groups.iter().map(|g| g.key).collect();
    assert_eq!(
        keys,
        vec![
            GroupKey::Enrollment,
            GroupKey::CurrentMonth,
            GroupKey::Month1,
            GroupKey::Month2
        ]
    );
    assert!(grand_total_closes(&preview));
}

#[test]
fn october_start_uses_november_and_december_tables() {
    let tuition = product("Weekly tuition", ItemType::Tuition, dec!(26000))
        .with_price_override(PriceTableKind::Enrollment, 11, dec!(19800))
        .with_price_override(PriceTableKind::Billing, 12, dec!(27500))
        // overrides on the wrong table must not leak
        .with_price_override(PriceTableKind::Billing, 11, dec!(1))
        .with_price_override(PriceTableKind::Enrollment, 12, dec!(1));
    let course = CourseDefinition::Course(Course::new(
        CourseId::new(),
        "Weekly math",
        vec![CourseItem::single(tuition)],
    ));

    let preview = calculate(&inputs(course, date(2026, 10, 7), Weekday::Wed)).unwrap();

    assert_eq!(preview.month1, 11);
    assert_eq!(preview.month2, 12);
    let month1 = preview.group(GroupKey::Month1).unwrap();
    let month2 = preview.group(GroupKey::Month2).unwrap();
    let m1_tuition: Vec<_> = month1
        .items
        .iter()
        .filter(|i| i.category == ItemType::Tuition)
        .collect();
    let m2_tuition: Vec<_> = month2
        .items
        .iter()
        .filter(|i| i.category == ItemType::Tuition)
        .collect();
    // 19800 + 10% = 21780; 27500 + 10% = 30250
    assert_eq!(m1_tuition[0].total_with_tax, Money::yen(21780));
    assert_eq!(m2_tuition[0].total_with_tax, Money::yen(30250));
}

#[test]
fn december_start_wraps_to_january_and_february() {
    let preview = calculate(&inputs(standard_course(), date(2026, 12, 7), Weekday::Mon)).unwrap();

    assert_eq!(preview.month1, 1);
    assert_eq!(preview.month2, 2);
}

#[test]
fn enrollment_tuition_bundle_joins_the_subtotal() {
    let bundle = product("2-ticket bundle", ItemType::EnrollmentTuition, dec!(6000));
    let mut input = inputs(standard_course(), date(2026, 1, 15), Weekday::Wed);
    input.enrollment_tuition_product = Some(bundle);

    let with_bundle = calculate(&input).unwrap();
    input.enrollment_tuition_product = None;
    let without_bundle = calculate(&input).unwrap();

    let item = with_bundle.enrollment_tuition_item.as_ref().unwrap();
    assert_eq!(item.total_with_tax, Money::yen(6600));
    assert_eq!(item.calculation_note.as_deref(), Some("2 tickets"));
    assert_eq!(
        with_bundle.grand_total,
        without_bundle.grand_total + Money::yen(6600)
    );
    assert!(grand_total_closes(&with_bundle));
    assert!(without_bundle.enrollment_tuition_item.is_none());
}

#[test]
fn textbooks_are_optional_until_selected() {
    let course = standard_course();
    let textbook_id = course.textbook_options()[0].product.id;

    let base = calculate(&inputs(course.clone(), date(2026, 1, 7), Weekday::Wed)).unwrap();
    assert_eq!(base.textbook_options.len(), 1);
    // unselected textbooks never join the totals
    assert!(!base
        .groups
        .iter()
        .flat_map(|g| g.items.iter())
        .any(|i| i.category == ItemType::Textbook));

    let mut input = inputs(course, date(2026, 1, 7), Weekday::Wed);
    input.selected_textbook_ids = vec![textbook_id];
    let selected = calculate(&input).unwrap();

    assert_eq!(selected.grand_total, base.grand_total + Money::yen(1650));
}

#[test]
fn unknown_textbook_selection_is_rejected() {
    let mut input = inputs(standard_course(), date(2026, 1, 7), Weekday::Wed);
    input.selected_textbook_ids = vec![ProductId::new()];

    assert!(matches!(
        calculate(&input),
        Err(BillingError::Validation(_))
    ));
}

#[test]
fn placeholders_keep_the_enrollment_group_shape() {
    // course with no enrollment fee and no enrollment textbook
    let course = CourseDefinition::Course(Course::new(
        CourseId::new(),
        "Bare course",
        vec![CourseItem::single(product(
            "Weekly tuition",
            ItemType::Tuition,
            dec!(26000),
        ))],
    ));
    let preview = calculate(&inputs(course, date(2026, 1, 7), Weekday::Wed)).unwrap();

    let enrollment = preview.group(GroupKey::Enrollment).unwrap();
    assert_eq!(enrollment.items.len(), 2);
    assert!(enrollment.items.iter().all(|i| i.is_placeholder()));
    assert!(enrollment.subtotal_with_tax().is_zero());
}

#[test]
fn mile_discount_reduces_grand_total_once() {
    let mut input = inputs(standard_course(), date(2026, 1, 7), Weekday::Wed);
    input.mile_info = MileInfo::new(10, true);
    input.mile_spend = Some(MileSpend {
        miles: 5,
        discount: Money::yen(2500),
    });

    let discounted = calculate(&input).unwrap();
    input.mile_spend = None;
    let undiscounted = calculate(&input).unwrap();

    assert_eq!(discounted.discounts.len(), 1);
    assert_eq!(discounted.discount_total, Money::yen(2500));
    assert_eq!(
        discounted.grand_total,
        undiscounted.grand_total - Money::yen(2500)
    );
    // every line item is untouched by the discount
    for (a, b) in discounted.groups.iter().zip(undiscounted.groups.iter()) {
        assert_eq!(a.items, b.items);
    }
    assert!(grand_total_closes(&discounted));
}

#[test]
fn mile_spend_below_minimum_fails_the_calculation() {
    let mut input = inputs(standard_course(), date(2026, 1, 7), Weekday::Wed);
    input.mile_info = MileInfo::new(10, true);
    input.mile_spend = Some(MileSpend {
        miles: 2,
        discount: Money::yen(1000),
    });

    assert!(matches!(
        calculate(&input),
        Err(BillingError::BelowMinimumMiles { .. })
    ));
}

#[test]
fn oversized_discount_surfaces_negative_total() {
    let course = CourseDefinition::Course(Course::new(
        CourseId::new(),
        "Cheap course",
        vec![CourseItem::single(product(
            "Weekly tuition",
            ItemType::Tuition,
            dec!(100),
        ))],
    ));
    let mut input = inputs(course, date(2026, 1, 7), Weekday::Wed);
    input.mile_info = MileInfo::new(1000, true);
    input.mile_spend = Some(MileSpend {
        miles: 1000,
        discount: Money::yen(500_000),
    });

    assert!(matches!(
        calculate(&input),
        Err(BillingError::NegativeTotal(_))
    ));
}

#[test]
fn identical_inputs_produce_identical_previews() {
    let input = inputs(standard_course(), date(2026, 3, 18), Weekday::Thu);

    let a = calculate(&input).unwrap();
    let b = calculate(&input).unwrap();

    assert_eq!(a, b);
}

#[test]
fn pack_flattens_member_courses_and_direct_items() {
    let math = Course::new(
        CourseId::new(),
        "Math",
        vec![CourseItem::single(product(
            "Math tuition",
            ItemType::Tuition,
            dec!(15000),
        ))],
    );
    let english = Course::new(
        CourseId::new(),
        "English",
        vec![CourseItem::single(product(
            "English tuition",
            ItemType::Tuition,
            dec!(12000),
        ))],
    );
    let pack = CourseDefinition::Pack(domain_catalog::Pack::new(
        CourseId::new(),
        "Math + English",
        vec![math, english],
        vec![CourseItem::single(product(
            "Pack bag",
            ItemType::Bag,
            dec!(2000),
        ))],
    ));

    let preview = calculate(&inputs(pack, date(2026, 1, 7), Weekday::Wed)).unwrap();

    let month1 = preview.group(GroupKey::Month1).unwrap();
    assert_eq!(month1.items.len(), 2);
    assert_eq!(month1.subtotal_with_tax(), Money::yen(16500 + 13200));

    let enrollment = preview.group(GroupKey::Enrollment).unwrap();
    assert!(enrollment
        .items
        .iter()
        .any(|i| i.category == ItemType::Bag && i.total_with_tax == Money::yen(2200)));
}
