//! Billing Domain - enrollment pricing and order materialization
//!
//! This crate computes everything a new enrollment costs:
//!
//! - **Proration**: weekday-occurrence counting for the partial first month
//! - **Ticket bucket**: tiered lesson-ticket bundles by day of enrollment
//! - **Enrollment fees**: one-off charges at full price
//! - **Monthly tuition**: first and second full-price months, with
//!   new-enrollee vs. steady-state price tables
//! - **Mile discounts**: gated loyalty-point redemption
//! - **Preview assembly**: one pure calculation shared by the read-only
//!   preview path and the transactional confirm path
//! - **Order materialization**: atomic persistence of identical amounts
//!
//! All computation is pure and side-effect-free; the only mutable state is
//! behind the `OrderWriter` and `MileLedgerPort` collaborator interfaces.

pub mod discount;
pub mod enrollment;
pub mod error;
pub mod line_item;
pub mod order;
pub mod preview;
pub mod proration;
pub mod service;
pub mod tuition;

pub use discount::{
    validate_mile_spend, DiscountLine, MileInfo, MileLedgerPort, MileSpend, MINIMUM_MILE_SPEND,
};
pub use enrollment::{additional_tickets, enrollment_one_off_lines, enrollment_tuition_line};
pub use error::BillingError;
pub use line_item::{BillingGroup, GroupKey, LineItem};
pub use order::{
    materialize, ConfirmRequest, ConfirmedOrder, MaterializedOrder, MileDebit, NewContract,
    NotificationPort, OrderMaterializer, OrderStatus, OrderWriter, PaymentMethod,
    PersistedLineItem,
};
pub use preview::{calculate, BillingInputs, BillingPreview, EnrollmentRequest};
pub use proration::{prorate_start_month, weekday_from_iso, ProrationResult};
pub use service::BillingPreviewService;
pub use tuition::{
    first_full_month, monthly_lines, prorated_current_month_lines, second_full_month,
};
