//! Test Utilities
//!
//! Shared helpers for the billing test suite:
//!
//! - **builders**: fluent construction of products, courses, and packs
//! - **fixtures**: canonical dates and catalog shapes
//! - **ports**: in-memory implementations of every collaborator port

pub mod builders;
pub mod fixtures;
pub mod ports;

pub use builders::{CourseBuilder, PackBuilder, ProductBuilder};
pub use fixtures::{first_wednesday, mid_january, standard_course, tenant};
pub use ports::{
    InMemoryCatalog, InMemoryMileLedger, InMemoryOrderStore, RecordingNotifier,
};
