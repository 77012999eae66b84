//! Catalog Domain - products, price tables, courses and packs
//!
//! This crate models the immutable catalog facts the billing engine consumes:
//!
//! - **PricedProduct**: a sellable item with a tax-exclusive base price and
//!   optional month-indexed override tables
//! - **PriceTableKind**: enrollment-month pricing vs. steady-state billing
//!   pricing
//! - **CourseDefinition**: a course (ordered items) or a pack (ordered
//!   courses plus direct items)
//! - **resolve_price**: total price resolution with base-price fallback
//! - **CatalogPort**: the async read interface adapters implement

pub mod course;
pub mod error;
pub mod ports;
pub mod product;
pub mod resolver;

pub use course::{Course, CourseDefinition, CourseItem, Pack};
pub use error::CatalogError;
pub use ports::CatalogPort;
pub use product::{default_tax_rate, ItemType, PriceTable, PriceTableKind, PricedProduct};
pub use resolver::resolve_price;
