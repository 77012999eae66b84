//! Catalog Domain Ports
//!
//! The catalog is owned by an external collaborator; this module defines the
//! read interface the billing engine consumes. Adapters exist for PostgreSQL
//! (infra_db) and in-memory state (test_utils).

use async_trait::async_trait;

use core_kernel::{CourseId, DomainPort, PortError, ProductId, TenantContext};

use crate::course::CourseDefinition;
use crate::product::PricedProduct;

/// Read access to the product and course catalog
#[async_trait]
pub trait CatalogPort: DomainPort {
    /// Looks up a course or pack by id.
    ///
    /// # Errors
    ///
    /// Returns `PortError::NotFound` if no course or pack has this id.
    async fn find_course(
        &self,
        tenant: &TenantContext,
        id: CourseId,
    ) -> Result<CourseDefinition, PortError>;

    /// Looks up a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `PortError::NotFound` if the product does not exist.
    async fn find_product(
        &self,
        tenant: &TenantContext,
        id: ProductId,
    ) -> Result<PricedProduct, PortError>;

    /// Finds the enrollment-tuition product sold for a course at a given
    /// ticket count.
    ///
    /// Absence is not an error: a course may simply not sell a bundle for
    /// that count, and the caller omits the charge.
    async fn find_enrollment_tuition_product(
        &self,
        tenant: &TenantContext,
        course_id: CourseId,
        ticket_count: u32,
    ) -> Result<Option<PricedProduct>, PortError>;
}
