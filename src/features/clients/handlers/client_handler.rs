use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::clients::dtos::{
    ClientQueryParams, ClientResponseDto, ClientStatsDto, CreateClientDto, UpdateClientDto,
};
use crate::features::clients::services::ClientService;
use crate::shared::types::ApiResponse;

/// List clients (paginated, by name)
#[utoipa::path(
    get,
    path = "/api/clients",
    params(ClientQueryParams),
    responses(
        (status = 200, description = "List of clients", body = ApiResponse<Vec<ClientResponseDto>>),
    ),
    tag = "clients"
)]
pub async fn list_clients(
    State(service): State<Arc<ClientService>>,
    Query(params): Query<ClientQueryParams>,
) -> Result<Json<ApiResponse<Vec<ClientResponseDto>>>> {
    let page = service.list(&params).await?;
    Ok(Json(ApiResponse::page(page)))
}

/// Get a client by ID
#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    params(
        ("id" = Uuid, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Client found", body = ApiResponse<ClientResponseDto>),
        (status = 404, description = "Client not found")
    ),
    tag = "clients"
)]
pub async fn get_client(
    State(service): State<Arc<ClientService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ClientResponseDto>>> {
    let client = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(client), None, None)))
}

/// Get a client by email
#[utoipa::path(
    get,
    path = "/api/clients/by-email/{email}",
    params(
        ("email" = String, Path, description = "Email address")
    ),
    responses(
        (status = 200, description = "Client found", body = ApiResponse<ClientResponseDto>),
        (status = 404, description = "Client not found")
    ),
    tag = "clients"
)]
pub async fn get_client_by_email(
    State(service): State<Arc<ClientService>>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<ClientResponseDto>>> {
    let client = service.get_by_email(&email).await?;
    Ok(Json(ApiResponse::success(Some(client), None, None)))
}

/// Get a client by exact name
#[utoipa::path(
    get,
    path = "/api/clients/by-name/{name}",
    params(
        ("name" = String, Path, description = "Client name")
    ),
    responses(
        (status = 200, description = "Client found", body = ApiResponse<ClientResponseDto>),
        (status = 404, description = "Client not found")
    ),
    tag = "clients"
)]
pub async fn get_client_by_name(
    State(service): State<Arc<ClientService>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<ClientResponseDto>>> {
    let client = service.get_by_name(&name).await?;
    Ok(Json(ApiResponse::success(Some(client), None, None)))
}

/// Register a client
#[utoipa::path(
    post,
    path = "/api/clients",
    request_body = CreateClientDto,
    responses(
        (status = 201, description = "Client created", body = ApiResponse<ClientResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "clients"
)]
pub async fn create_client(
    State(service): State<Arc<ClientService>>,
    ValidatedJson(dto): ValidatedJson<CreateClientDto>,
) -> Result<(StatusCode, Json<ApiResponse<ClientResponseDto>>)> {
    let client = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(client), None, None)),
    ))
}

/// Update a client
#[utoipa::path(
    patch,
    path = "/api/clients/{id}",
    params(
        ("id" = Uuid, Path, description = "Client ID")
    ),
    request_body = UpdateClientDto,
    responses(
        (status = 200, description = "Client updated", body = ApiResponse<ClientResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Client not found"),
        (status = 409, description = "Email already registered")
    ),
    tag = "clients"
)]
pub async fn update_client(
    State(service): State<Arc<ClientService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateClientDto>,
) -> Result<Json<ApiResponse<ClientResponseDto>>> {
    let client = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(client), None, None)))
}

/// Delete a client
#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    params(
        ("id" = Uuid, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Client deleted"),
        (status = 404, description = "Client not found"),
        (status = 409, description = "Client still has transactions")
    ),
    tag = "clients"
)]
pub async fn delete_client(
    State(service): State<Arc<ClientService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Client deleted".to_string()),
        None,
    )))
}

/// Purchase statistics for a client
#[utoipa::path(
    get,
    path = "/api/clients/{id}/stats",
    params(
        ("id" = Uuid, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Client statistics", body = ApiResponse<ClientStatsDto>),
        (status = 404, description = "Client not found")
    ),
    tag = "clients"
)]
pub async fn get_client_stats(
    State(service): State<Arc<ClientService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ClientStatsDto>>> {
    let stats = service.detail_stats(id).await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}
