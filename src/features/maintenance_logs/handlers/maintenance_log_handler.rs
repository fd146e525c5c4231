use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::maintenance_logs::dtos::{
    CreateMaintenanceLogDto, MaintenanceLogQueryParams, MaintenanceLogResponseDto,
    UpdateMaintenanceLogDto,
};
use crate::features::maintenance_logs::services::MaintenanceLogService;
use crate::shared::types::ApiResponse;

/// List maintenance logs with equipment names
#[utoipa::path(
    get,
    path = "/api/maintenance-logs",
    params(MaintenanceLogQueryParams),
    responses(
        (status = 200, description = "List of maintenance logs", body = ApiResponse<Vec<MaintenanceLogResponseDto>>),
    ),
    tag = "maintenance-logs"
)]
pub async fn list_maintenance_logs(
    State(service): State<Arc<MaintenanceLogService>>,
    Query(params): Query<MaintenanceLogQueryParams>,
) -> Result<Json<ApiResponse<Vec<MaintenanceLogResponseDto>>>> {
    let page = service.list(&params).await?;
    Ok(Json(ApiResponse::page(page)))
}

/// Get a maintenance log by ID
#[utoipa::path(
    get,
    path = "/api/maintenance-logs/{id}",
    params(
        ("id" = Uuid, Path, description = "Maintenance log ID")
    ),
    responses(
        (status = 200, description = "Maintenance log found", body = ApiResponse<MaintenanceLogResponseDto>),
        (status = 404, description = "Maintenance log not found")
    ),
    tag = "maintenance-logs"
)]
pub async fn get_maintenance_log(
    State(service): State<Arc<MaintenanceLogService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MaintenanceLogResponseDto>>> {
    let log = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(log), None, None)))
}

/// Log maintenance
#[utoipa::path(
    post,
    path = "/api/maintenance-logs",
    request_body = CreateMaintenanceLogDto,
    responses(
        (status = 201, description = "Maintenance log created", body = ApiResponse<MaintenanceLogResponseDto>),
        (status = 400, description = "Validation error or unknown equipment")
    ),
    tag = "maintenance-logs"
)]
pub async fn create_maintenance_log(
    State(service): State<Arc<MaintenanceLogService>>,
    ValidatedJson(dto): ValidatedJson<CreateMaintenanceLogDto>,
) -> Result<(StatusCode, Json<ApiResponse<MaintenanceLogResponseDto>>)> {
    let log = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(log), None, None)),
    ))
}

/// Update a maintenance log
#[utoipa::path(
    patch,
    path = "/api/maintenance-logs/{id}",
    params(
        ("id" = Uuid, Path, description = "Maintenance log ID")
    ),
    request_body = UpdateMaintenanceLogDto,
    responses(
        (status = 200, description = "Maintenance log updated", body = ApiResponse<MaintenanceLogResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Maintenance log not found")
    ),
    tag = "maintenance-logs"
)]
pub async fn update_maintenance_log(
    State(service): State<Arc<MaintenanceLogService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateMaintenanceLogDto>,
) -> Result<Json<ApiResponse<MaintenanceLogResponseDto>>> {
    let log = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(log), None, None)))
}

/// Delete a maintenance log
#[utoipa::path(
    delete,
    path = "/api/maintenance-logs/{id}",
    params(
        ("id" = Uuid, Path, description = "Maintenance log ID")
    ),
    responses(
        (status = 200, description = "Maintenance log deleted"),
        (status = 404, description = "Maintenance log not found")
    ),
    tag = "maintenance-logs"
)]
pub async fn delete_maintenance_log(
    State(service): State<Arc<MaintenanceLogService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Maintenance log deleted".to_string()),
        None,
    )))
}
