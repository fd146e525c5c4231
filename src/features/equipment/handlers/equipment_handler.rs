use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::equipment::dtos::{
    CreateEquipmentDto, EquipmentQueryParams, EquipmentResponseDto, UpdateEquipmentDto,
};
use crate::features::equipment::services::EquipmentService;
use crate::shared::types::ApiResponse;

/// List equipment (paginated, by name)
#[utoipa::path(
    get,
    path = "/api/equipment",
    params(EquipmentQueryParams),
    responses(
        (status = 200, description = "List of equipment", body = ApiResponse<Vec<EquipmentResponseDto>>),
    ),
    tag = "equipment"
)]
pub async fn list_equipment(
    State(service): State<Arc<EquipmentService>>,
    Query(params): Query<EquipmentQueryParams>,
) -> Result<Json<ApiResponse<Vec<EquipmentResponseDto>>>> {
    let page = service.list(&params).await?;
    Ok(Json(ApiResponse::page(page)))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/api/equipment/{id}",
    params(
        ("id" = Uuid, Path, description = "Equipment ID")
    ),
    responses(
        (status = 200, description = "Equipment found", body = ApiResponse<EquipmentResponseDto>),
        (status = 404, description = "Equipment not found")
    ),
    tag = "equipment"
)]
pub async fn get_equipment(
    State(service): State<Arc<EquipmentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EquipmentResponseDto>>> {
    let equipment = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(equipment), None, None)))
}

/// Register equipment
#[utoipa::path(
    post,
    path = "/api/equipment",
    request_body = CreateEquipmentDto,
    responses(
        (status = 201, description = "Equipment created", body = ApiResponse<EquipmentResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "equipment"
)]
pub async fn create_equipment(
    State(service): State<Arc<EquipmentService>>,
    ValidatedJson(dto): ValidatedJson<CreateEquipmentDto>,
) -> Result<(StatusCode, Json<ApiResponse<EquipmentResponseDto>>)> {
    let equipment = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(equipment), None, None)),
    ))
}

/// Update equipment
#[utoipa::path(
    patch,
    path = "/api/equipment/{id}",
    params(
        ("id" = Uuid, Path, description = "Equipment ID")
    ),
    request_body = UpdateEquipmentDto,
    responses(
        (status = 200, description = "Equipment updated", body = ApiResponse<EquipmentResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Equipment not found")
    ),
    tag = "equipment"
)]
pub async fn update_equipment(
    State(service): State<Arc<EquipmentService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateEquipmentDto>,
) -> Result<Json<ApiResponse<EquipmentResponseDto>>> {
    let equipment = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(equipment), None, None)))
}

/// Delete equipment
#[utoipa::path(
    delete,
    path = "/api/equipment/{id}",
    params(
        ("id" = Uuid, Path, description = "Equipment ID")
    ),
    responses(
        (status = 200, description = "Equipment deleted"),
        (status = 404, description = "Equipment not found")
    ),
    tag = "equipment"
)]
pub async fn delete_equipment(
    State(service): State<Arc<EquipmentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Equipment deleted".to_string()),
        None,
    )))
}
