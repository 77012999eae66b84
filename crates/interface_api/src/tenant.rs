//! Tenant extraction
//!
//! Every request names the brand and school it operates for via the
//! `X-Brand-Id` and `X-School-Id` headers. The extractor turns them into an
//! explicit `TenantContext`; handlers never read ambient tenant state.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use core_kernel::TenantContext;

use crate::error::ApiError;

/// Header naming the brand a request operates for
pub const BRAND_HEADER: &str = "x-brand-id";

/// Header naming the school a request operates for
pub const SCHOOL_HEADER: &str = "x-school-id";

/// Extracts the tenant context from request headers
pub struct Tenant(pub TenantContext);

#[async_trait]
impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let brand_id = header_uuid(parts, BRAND_HEADER)?;
        let school_id = header_uuid(parts, SCHOOL_HEADER)?;
        Ok(Tenant(TenantContext::new(brand_id.into(), school_id.into())))
    }
}

fn header_uuid(parts: &Parts, name: &str) -> Result<Uuid, ApiError> {
    let value = parts
        .headers
        .get(name)
        .ok_or_else(|| ApiError::BadRequest(format!("missing {name} header")))?
        .to_str()
        .map_err(|_| ApiError::BadRequest(format!("invalid {name} header")))?;
    Uuid::parse_str(value).map_err(|_| ApiError::BadRequest(format!("invalid {name} header")))
}
