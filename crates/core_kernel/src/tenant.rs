//! Tenant context
//!
//! Every entry point receives the brand and school it operates for as an
//! explicit value. There is no ambient or request-global tenant state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identifiers::{BrandId, SchoolId};

/// The brand and school a request is scoped to.
///
/// Catalog lookups, ledger reads, and order writes are all keyed by this
/// pair; handing it around explicitly keeps every collaborator call
/// auditable from the signature alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    pub brand_id: BrandId,
    pub school_id: SchoolId,
}

impl TenantContext {
    pub fn new(brand_id: BrandId, school_id: SchoolId) -> Self {
        Self { brand_id, school_id }
    }
}

impl fmt::Display for TenantContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.brand_id, self.school_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_both_ids() {
        let tenant = TenantContext::new(BrandId::new(), SchoolId::new());
        let s = tenant.to_string();
        assert!(s.contains("BRN-"));
        assert!(s.contains("SCL-"));
    }
}
