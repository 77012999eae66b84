//! Repository implementations

pub mod catalog;
pub mod ledger;
pub mod orders;

pub use catalog::CatalogRepository;
pub use ledger::MileLedgerRepository;
pub use orders::OrderRepository;
