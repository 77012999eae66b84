//! Core Kernel - Foundational types and utilities for the tutoring billing system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic and truncation-to-unit billing rules
//! - Strongly-typed identifiers
//! - Explicit tenant context
//! - Port infrastructure for collaborator interfaces

pub mod error;
pub mod identifiers;
pub mod money;
pub mod ports;
pub mod tenant;

pub use error::CoreError;
pub use identifiers::{
    BrandId, ContractId, CourseId, GuardianId, LedgerEntryId, LineItemId, OrderId, ProductId,
    ScheduleId, SchoolId, StudentId,
};
pub use money::{Currency, Money, MoneyError};
pub use ports::{DomainPort, PortError};
pub use tenant::TenantContext;
