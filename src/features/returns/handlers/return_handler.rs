use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::returns::dtos::{
    CreateReturnDto, ReturnResponseDto, ReturnTimelineDto, UpdateReturnDto,
};
use crate::features::returns::services::ReturnService;
use crate::shared::types::{ApiResponse, PaginationQuery};

/// List returns with product names
#[utoipa::path(
    get,
    path = "/api/returns",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of returns", body = ApiResponse<Vec<ReturnResponseDto>>),
    ),
    tag = "returns"
)]
pub async fn list_returns(
    State(service): State<Arc<ReturnService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReturnResponseDto>>>> {
    let page = service.list(&params).await?;
    Ok(Json(ApiResponse::page(page)))
}

/// Returns placed on their transaction dates, for charting
#[utoipa::path(
    get,
    path = "/api/returns/timeline",
    responses(
        (status = 200, description = "Returns with transaction dates", body = ApiResponse<Vec<ReturnTimelineDto>>),
    ),
    tag = "returns"
)]
pub async fn list_return_timeline(
    State(service): State<Arc<ReturnService>>,
) -> Result<Json<ApiResponse<Vec<ReturnTimelineDto>>>> {
    let entries = service.list_with_dates().await?;
    Ok(Json(ApiResponse::success(Some(entries), None, None)))
}

/// Get a return by ID
#[utoipa::path(
    get,
    path = "/api/returns/{id}",
    params(
        ("id" = Uuid, Path, description = "Return ID")
    ),
    responses(
        (status = 200, description = "Return found", body = ApiResponse<ReturnResponseDto>),
        (status = 404, description = "Return not found")
    ),
    tag = "returns"
)]
pub async fn get_return(
    State(service): State<Arc<ReturnService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReturnResponseDto>>> {
    let record = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(record), None, None)))
}

/// Get the return filed against an order
#[utoipa::path(
    get,
    path = "/api/orders/{id}/return",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Return found", body = ApiResponse<ReturnResponseDto>),
        (status = 404, description = "No return for the order")
    ),
    tag = "returns"
)]
pub async fn get_order_return(
    State(service): State<Arc<ReturnService>>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReturnResponseDto>>> {
    let record = service.get_by_order(order_id).await?;
    Ok(Json(ApiResponse::success(Some(record), None, None)))
}

/// Register a return
#[utoipa::path(
    post,
    path = "/api/returns",
    request_body = CreateReturnDto,
    responses(
        (status = 201, description = "Return created", body = ApiResponse<ReturnResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already returned")
    ),
    tag = "returns"
)]
pub async fn create_return(
    State(service): State<Arc<ReturnService>>,
    ValidatedJson(dto): ValidatedJson<CreateReturnDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReturnResponseDto>>)> {
    let record = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(record), None, None)),
    ))
}

/// Update a return
#[utoipa::path(
    patch,
    path = "/api/returns/{id}",
    params(
        ("id" = Uuid, Path, description = "Return ID")
    ),
    request_body = UpdateReturnDto,
    responses(
        (status = 200, description = "Return updated", body = ApiResponse<ReturnResponseDto>),
        (status = 404, description = "Return not found"),
        (status = 409, description = "Insufficient stock to undo a restock")
    ),
    tag = "returns"
)]
pub async fn update_return(
    State(service): State<Arc<ReturnService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateReturnDto>,
) -> Result<Json<ApiResponse<ReturnResponseDto>>> {
    let record = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(record), None, None)))
}

/// Delete a return
#[utoipa::path(
    delete,
    path = "/api/returns/{id}",
    params(
        ("id" = Uuid, Path, description = "Return ID")
    ),
    responses(
        (status = 200, description = "Return deleted"),
        (status = 404, description = "Return not found"),
        (status = 409, description = "Insufficient stock to undo the restock")
    ),
    tag = "returns"
)]
pub async fn delete_return(
    State(service): State<Arc<ReturnService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Return deleted".to_string()),
        None,
    )))
}
