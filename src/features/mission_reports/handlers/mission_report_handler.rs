use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::mission_reports::dtos::{
    CreateMissionReportDto, MissionReportQueryParams, MissionReportResponseDto,
    UpdateMissionReportDto,
};
use crate::features::mission_reports::services::MissionReportService;
use crate::shared::types::ApiResponse;

/// List mission reports with reporter and incident context
#[utoipa::path(
    get,
    path = "/api/mission-reports",
    params(MissionReportQueryParams),
    responses(
        (status = 200, description = "List of mission reports", body = ApiResponse<Vec<MissionReportResponseDto>>),
    ),
    tag = "mission-reports"
)]
pub async fn list_mission_reports(
    State(service): State<Arc<MissionReportService>>,
    Query(params): Query<MissionReportQueryParams>,
) -> Result<Json<ApiResponse<Vec<MissionReportResponseDto>>>> {
    let page = service.list(&params).await?;
    Ok(Json(ApiResponse::page(page)))
}

/// Get a mission report by ID
#[utoipa::path(
    get,
    path = "/api/mission-reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Mission report ID")
    ),
    responses(
        (status = 200, description = "Mission report found", body = ApiResponse<MissionReportResponseDto>),
        (status = 404, description = "Mission report not found")
    ),
    tag = "mission-reports"
)]
pub async fn get_mission_report(
    State(service): State<Arc<MissionReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MissionReportResponseDto>>> {
    let report = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// File a mission report
#[utoipa::path(
    post,
    path = "/api/mission-reports",
    request_body = CreateMissionReportDto,
    responses(
        (status = 201, description = "Mission report created", body = ApiResponse<MissionReportResponseDto>),
        (status = 400, description = "Validation error or unknown incident/reporter")
    ),
    tag = "mission-reports"
)]
pub async fn create_mission_report(
    State(service): State<Arc<MissionReportService>>,
    ValidatedJson(dto): ValidatedJson<CreateMissionReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<MissionReportResponseDto>>)> {
    let report = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(report), None, None)),
    ))
}

/// Update a mission report
#[utoipa::path(
    patch,
    path = "/api/mission-reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Mission report ID")
    ),
    request_body = UpdateMissionReportDto,
    responses(
        (status = 200, description = "Mission report updated", body = ApiResponse<MissionReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Mission report not found")
    ),
    tag = "mission-reports"
)]
pub async fn update_mission_report(
    State(service): State<Arc<MissionReportService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateMissionReportDto>,
) -> Result<Json<ApiResponse<MissionReportResponseDto>>> {
    let report = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Delete a mission report
#[utoipa::path(
    delete,
    path = "/api/mission-reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Mission report ID")
    ),
    responses(
        (status = 200, description = "Mission report deleted"),
        (status = 404, description = "Mission report not found")
    ),
    tag = "mission-reports"
)]
pub async fn delete_mission_report(
    State(service): State<Arc<MissionReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Mission report deleted".to_string()),
        None,
    )))
}
