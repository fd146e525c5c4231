use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::dispatches::dtos::{
    CreateDispatchDto, DispatchResponseDto, UpdateDispatchDto,
};
use crate::features::dispatches::services::DispatchService;
use crate::shared::types::{ApiResponse, PaginationQuery};

/// List dispatches (newest first)
#[utoipa::path(
    get,
    path = "/api/dispatches",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of dispatches", body = ApiResponse<Vec<DispatchResponseDto>>),
    ),
    tag = "dispatches"
)]
pub async fn list_dispatches(
    State(service): State<Arc<DispatchService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<DispatchResponseDto>>>> {
    let page = service.list(&params).await?;
    Ok(Json(ApiResponse::page(page)))
}

/// List the dispatches of an incident
#[utoipa::path(
    get,
    path = "/api/incidents/{id}/dispatches",
    params(
        ("id" = Uuid, Path, description = "Incident ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Dispatches of the incident", body = ApiResponse<Vec<DispatchResponseDto>>),
        (status = 404, description = "Incident not found")
    ),
    tag = "dispatches"
)]
pub async fn list_incident_dispatches(
    State(service): State<Arc<DispatchService>>,
    Path(incident_id): Path<Uuid>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<DispatchResponseDto>>>> {
    let page = service.list_by_incident(incident_id, &params).await?;
    Ok(Json(ApiResponse::page(page)))
}

/// Get a dispatch by ID
#[utoipa::path(
    get,
    path = "/api/dispatches/{id}",
    params(
        ("id" = Uuid, Path, description = "Dispatch ID")
    ),
    responses(
        (status = 200, description = "Dispatch found", body = ApiResponse<DispatchResponseDto>),
        (status = 404, description = "Dispatch not found")
    ),
    tag = "dispatches"
)]
pub async fn get_dispatch(
    State(service): State<Arc<DispatchService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DispatchResponseDto>>> {
    let dispatch = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(dispatch), None, None)))
}

/// Dispatch personnel and/or equipment to an incident
#[utoipa::path(
    post,
    path = "/api/dispatches",
    request_body = CreateDispatchDto,
    responses(
        (status = 201, description = "Dispatch created", body = ApiResponse<DispatchResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Incident or resource not found"),
        (status = 409, description = "Incident resolved or resource unavailable")
    ),
    tag = "dispatches"
)]
pub async fn create_dispatch(
    State(service): State<Arc<DispatchService>>,
    ValidatedJson(dto): ValidatedJson<CreateDispatchDto>,
) -> Result<(StatusCode, Json<ApiResponse<DispatchResponseDto>>)> {
    let dispatch = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(dispatch), None, None)),
    ))
}

/// Update a dispatch
#[utoipa::path(
    patch,
    path = "/api/dispatches/{id}",
    params(
        ("id" = Uuid, Path, description = "Dispatch ID")
    ),
    request_body = UpdateDispatchDto,
    responses(
        (status = 200, description = "Dispatch updated", body = ApiResponse<DispatchResponseDto>),
        (status = 404, description = "Dispatch or resource not found"),
        (status = 409, description = "Incident resolved or resource unavailable")
    ),
    tag = "dispatches"
)]
pub async fn update_dispatch(
    State(service): State<Arc<DispatchService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateDispatchDto>,
) -> Result<Json<ApiResponse<DispatchResponseDto>>> {
    let dispatch = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(dispatch), None, None)))
}

/// Delete a dispatch, releasing its resources
#[utoipa::path(
    delete,
    path = "/api/dispatches/{id}",
    params(
        ("id" = Uuid, Path, description = "Dispatch ID")
    ),
    responses(
        (status = 200, description = "Dispatch deleted"),
        (status = 404, description = "Dispatch not found")
    ),
    tag = "dispatches"
)]
pub async fn delete_dispatch(
    State(service): State<Arc<DispatchService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Dispatch deleted".to_string()),
        None,
    )))
}
