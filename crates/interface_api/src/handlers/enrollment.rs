//! Enrollment handlers
//!
//! The preview handler is the read-only adapter over the billing
//! calculation; the confirm handler is the transactional one. Both run the
//! same computation.

use axum::{extract::State, Json};

use crate::dto::enrollment::{
    ConfirmRequestDto, ConfirmResponseDto, PreviewRequestDto, PreviewResponseDto,
};
use crate::tenant::Tenant;
use crate::{error::ApiError, AppState};

/// Prices an enrollment without persisting anything
pub async fn preview(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Json(request): Json<PreviewRequestDto>,
) -> Result<Json<PreviewResponseDto>, ApiError> {
    let request = request.into_domain();
    let preview = state.preview_service().preview(&tenant, &request).await?;
    Ok(Json(PreviewResponseDto::from(&preview)))
}

/// Confirms an enrollment: re-derives all amounts and persists them
pub async fn confirm(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Json(request): Json<ConfirmRequestDto>,
) -> Result<Json<ConfirmResponseDto>, ApiError> {
    let request = request.into_domain();
    let confirmed = state
        .order_materializer()
        .confirm(&tenant, &request)
        .await?;
    Ok(Json(ConfirmResponseDto::from(&confirmed)))
}
