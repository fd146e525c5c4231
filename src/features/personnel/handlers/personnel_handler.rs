use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::personnel::dtos::{
    CreatePersonnelDto, PersonnelQueryParams, PersonnelResponseDto, PersonnelStatsDto,
    UpdatePersonnelDto,
};
use crate::features::personnel::services::PersonnelService;
use crate::shared::types::ApiResponse;

/// List personnel (paginated, by name)
#[utoipa::path(
    get,
    path = "/api/personnel",
    params(PersonnelQueryParams),
    responses(
        (status = 200, description = "List of personnel", body = ApiResponse<Vec<PersonnelResponseDto>>),
    ),
    tag = "personnel"
)]
pub async fn list_personnel(
    State(service): State<Arc<PersonnelService>>,
    Query(params): Query<PersonnelQueryParams>,
) -> Result<Json<ApiResponse<Vec<PersonnelResponseDto>>>> {
    let page = service.list(&params).await?;
    Ok(Json(ApiResponse::page(page)))
}

/// Get a team member by ID
#[utoipa::path(
    get,
    path = "/api/personnel/{id}",
    params(
        ("id" = Uuid, Path, description = "Personnel ID")
    ),
    responses(
        (status = 200, description = "Personnel found", body = ApiResponse<PersonnelResponseDto>),
        (status = 404, description = "Personnel not found")
    ),
    tag = "personnel"
)]
pub async fn get_personnel(
    State(service): State<Arc<PersonnelService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PersonnelResponseDto>>> {
    let person = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(person), None, None)))
}

/// Get a team member by email
#[utoipa::path(
    get,
    path = "/api/personnel/by-email/{email}",
    params(
        ("email" = String, Path, description = "Email address")
    ),
    responses(
        (status = 200, description = "Personnel found", body = ApiResponse<PersonnelResponseDto>),
        (status = 404, description = "Personnel not found")
    ),
    tag = "personnel"
)]
pub async fn get_personnel_by_email(
    State(service): State<Arc<PersonnelService>>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<PersonnelResponseDto>>> {
    let person = service.get_by_email(&email).await?;
    Ok(Json(ApiResponse::success(Some(person), None, None)))
}

/// Add a team member
#[utoipa::path(
    post,
    path = "/api/personnel",
    request_body = CreatePersonnelDto,
    responses(
        (status = 201, description = "Personnel created", body = ApiResponse<PersonnelResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "personnel"
)]
pub async fn create_personnel(
    State(service): State<Arc<PersonnelService>>,
    ValidatedJson(dto): ValidatedJson<CreatePersonnelDto>,
) -> Result<(StatusCode, Json<ApiResponse<PersonnelResponseDto>>)> {
    let person = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(person), None, None)),
    ))
}

/// Update a team member
#[utoipa::path(
    patch,
    path = "/api/personnel/{id}",
    params(
        ("id" = Uuid, Path, description = "Personnel ID")
    ),
    request_body = UpdatePersonnelDto,
    responses(
        (status = 200, description = "Personnel updated", body = ApiResponse<PersonnelResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Personnel not found"),
        (status = 409, description = "Email already registered")
    ),
    tag = "personnel"
)]
pub async fn update_personnel(
    State(service): State<Arc<PersonnelService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdatePersonnelDto>,
) -> Result<Json<ApiResponse<PersonnelResponseDto>>> {
    let person = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(person), None, None)))
}

/// Delete a team member
#[utoipa::path(
    delete,
    path = "/api/personnel/{id}",
    params(
        ("id" = Uuid, Path, description = "Personnel ID")
    ),
    responses(
        (status = 200, description = "Personnel deleted"),
        (status = 404, description = "Personnel not found")
    ),
    tag = "personnel"
)]
pub async fn delete_personnel(
    State(service): State<Arc<PersonnelService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Personnel deleted".to_string()),
        None,
    )))
}

/// Mission statistics for a team member
#[utoipa::path(
    get,
    path = "/api/personnel/{id}/stats",
    params(
        ("id" = Uuid, Path, description = "Personnel ID")
    ),
    responses(
        (status = 200, description = "Personnel statistics", body = ApiResponse<PersonnelStatsDto>),
        (status = 404, description = "Personnel not found")
    ),
    tag = "personnel"
)]
pub async fn get_personnel_stats(
    State(service): State<Arc<PersonnelService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PersonnelStatsDto>>> {
    let stats = service.detail_stats(id).await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}
