//! Canonical fixtures
//!
//! Dates and catalog shapes used across the test suite.

use chrono::NaiveDate;

use core_kernel::{BrandId, SchoolId, TenantContext};
use domain_catalog::CourseDefinition;

use crate::builders::{CourseBuilder, ProductBuilder};

/// A tenant for tests that do not care about specific ids
pub fn tenant() -> TenantContext {
    TenantContext::new(BrandId::new(), SchoolId::new())
}

/// 2026-01-07, the first Wednesday of January 2026
pub fn first_wednesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 7).unwrap()
}

/// 2026-01-15, a Thursday; two of January's four Wednesdays remain
pub fn mid_january() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
}

/// A course with the full spread of item types:
/// tuition ¥26,000, facility ¥2,000, monthly fee ¥1,000,
/// enrollment fee ¥11,000, enrollment textbook ¥3,000, and one
/// selectable textbook at ¥1,500.
pub fn standard_course() -> CourseDefinition {
    CourseBuilder::new("Weekly math")
        .with_product(ProductBuilder::tuition().build())
        .with_product(ProductBuilder::facility().build())
        .with_product(ProductBuilder::monthly_fee().build())
        .with_product(ProductBuilder::enrollment_fee().build())
        .with_product(ProductBuilder::enrollment_textbook().build())
        .with_product(ProductBuilder::textbook().build())
        .build()
}
