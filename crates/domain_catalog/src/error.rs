//! Catalog domain errors

use core_kernel::ProductId;
use thiserror::Error;

/// Errors that can occur when constructing catalog data
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A course item must include at least one unit of its product
    #[error("Course item for product {product_id} has zero quantity")]
    ZeroQuantity { product_id: ProductId },

    /// An item type string from storage did not match any known variant
    #[error("Unknown item type: {0}")]
    UnknownItemType(String),
}
