use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::incidents::dtos::{
    CreateIncidentDto, IncidentQueryParams, IncidentResponseDto, UpdateIncidentDto,
    UpdateIncidentStatusDto,
};
use crate::features::incidents::services::IncidentService;
use crate::shared::types::ApiResponse;

/// List incidents (paginated, newest first)
#[utoipa::path(
    get,
    path = "/api/incidents",
    params(IncidentQueryParams),
    responses(
        (status = 200, description = "List of incidents", body = ApiResponse<Vec<IncidentResponseDto>>),
    ),
    tag = "incidents"
)]
pub async fn list_incidents(
    State(service): State<Arc<IncidentService>>,
    Query(params): Query<IncidentQueryParams>,
) -> Result<Json<ApiResponse<Vec<IncidentResponseDto>>>> {
    let page = service.list(&params).await?;
    Ok(Json(ApiResponse::page(page)))
}

/// Get incident by ID
#[utoipa::path(
    get,
    path = "/api/incidents/{id}",
    params(
        ("id" = Uuid, Path, description = "Incident ID")
    ),
    responses(
        (status = 200, description = "Incident found", body = ApiResponse<IncidentResponseDto>),
        (status = 404, description = "Incident not found")
    ),
    tag = "incidents"
)]
pub async fn get_incident(
    State(service): State<Arc<IncidentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<IncidentResponseDto>>> {
    let incident = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(incident), None, None)))
}

/// Report a new incident
#[utoipa::path(
    post,
    path = "/api/incidents",
    request_body = CreateIncidentDto,
    responses(
        (status = 201, description = "Incident created", body = ApiResponse<IncidentResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "incidents"
)]
pub async fn create_incident(
    State(service): State<Arc<IncidentService>>,
    ValidatedJson(dto): ValidatedJson<CreateIncidentDto>,
) -> Result<(StatusCode, Json<ApiResponse<IncidentResponseDto>>)> {
    let incident = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(incident),
            Some("Incident reported".to_string()),
            None,
        )),
    ))
}

/// Update incident details
///
/// Status is not accepted here; a body carrying `status` is rejected with 400.
/// Use `PATCH /api/incidents/{id}/status`, which also releases resources on resolve.
#[utoipa::path(
    patch,
    path = "/api/incidents/{id}",
    params(
        ("id" = Uuid, Path, description = "Incident ID")
    ),
    request_body = UpdateIncidentDto,
    responses(
        (status = 200, description = "Incident updated", body = ApiResponse<IncidentResponseDto>),
        (status = 400, description = "Validation error, or the body carries `status`"),
        (status = 404, description = "Incident not found")
    ),
    tag = "incidents"
)]
pub async fn update_incident(
    State(service): State<Arc<IncidentService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateIncidentDto>,
) -> Result<Json<ApiResponse<IncidentResponseDto>>> {
    let incident = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(incident), None, None)))
}

/// Change incident status
///
/// Resolving an incident makes every dispatched person available again and
/// returns in-use equipment to `Available`.
#[utoipa::path(
    patch,
    path = "/api/incidents/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Incident ID")
    ),
    request_body = UpdateIncidentStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<IncidentResponseDto>),
        (status = 404, description = "Incident not found")
    ),
    tag = "incidents"
)]
pub async fn update_incident_status(
    State(service): State<Arc<IncidentService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateIncidentStatusDto>,
) -> Result<Json<ApiResponse<IncidentResponseDto>>> {
    let incident = service.update_status(id, dto.status).await?;
    Ok(Json(ApiResponse::success(Some(incident), None, None)))
}

/// Delete an incident together with its dispatches and mission reports
#[utoipa::path(
    delete,
    path = "/api/incidents/{id}",
    params(
        ("id" = Uuid, Path, description = "Incident ID")
    ),
    responses(
        (status = 200, description = "Incident deleted"),
        (status = 404, description = "Incident not found")
    ),
    tag = "incidents"
)]
pub async fn delete_incident(
    State(service): State<Arc<IncidentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Incident deleted".to_string()),
        None,
    )))
}
