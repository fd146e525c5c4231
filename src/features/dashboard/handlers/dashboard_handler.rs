use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::dashboard::dtos::*;
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::ApiResponse;

// ============================================================================
// Summary
// ============================================================================

/// Get headline operations counters
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = ApiResponse<DashboardSummaryDto>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_summary(
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<DashboardSummaryDto>>> {
    let summary = service.get_summary().await?;
    Ok(Json(ApiResponse::success(Some(summary), None, None)))
}

// ============================================================================
// Export
// ============================================================================

/// Export all operational records for the report service
#[utoipa::path(
    get,
    path = "/api/dashboard/export",
    tag = "dashboard",
    responses(
        (status = 200, description = "Operations snapshot", body = ApiResponse<OperationsExportDto>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn export_operations(
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<OperationsExportDto>>> {
    let export = service.export().await?;
    Ok(Json(ApiResponse::success(Some(export), None, None)))
}
