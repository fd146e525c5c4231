use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::orders::dtos::{CreateOrderDto, OrderResponseDto, UpdateOrderDto};
use crate::features::orders::services::{OrderScope, OrderService};
use crate::shared::types::{ApiResponse, PaginationQuery};

/// List orders (paginated, newest first)
#[utoipa::path(
    get,
    path = "/api/orders",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of orders", body = ApiResponse<Vec<OrderResponseDto>>),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    State(service): State<Arc<OrderService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<OrderResponseDto>>>> {
    let page = service.list(OrderScope::All, &params).await?;
    Ok(Json(ApiResponse::page(page)))
}

/// List the orders of a transaction
#[utoipa::path(
    get,
    path = "/api/transactions/{id}/orders",
    params(
        ("id" = Uuid, Path, description = "Transaction ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Orders of the transaction", body = ApiResponse<Vec<OrderResponseDto>>),
        (status = 404, description = "Transaction not found")
    ),
    tag = "orders"
)]
pub async fn list_transaction_orders(
    State(service): State<Arc<OrderService>>,
    Path(transaction_id): Path<Uuid>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<OrderResponseDto>>>> {
    let page = service
        .list(OrderScope::Transaction(transaction_id), &params)
        .await?;
    Ok(Json(ApiResponse::page(page)))
}

/// List the orders of a product
#[utoipa::path(
    get,
    path = "/api/products/{id}/orders",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Orders of the product", body = ApiResponse<Vec<OrderResponseDto>>),
        (status = 404, description = "Product not found")
    ),
    tag = "orders"
)]
pub async fn list_product_orders(
    State(service): State<Arc<OrderService>>,
    Path(product_id): Path<Uuid>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<OrderResponseDto>>>> {
    let page = service.list(OrderScope::Product(product_id), &params).await?;
    Ok(Json(ApiResponse::page(page)))
}

/// Get an order by ID
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order found", body = ApiResponse<OrderResponseDto>),
        (status = 404, description = "Order not found")
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(service): State<Arc<OrderService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderResponseDto>>> {
    let order = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(order), None, None)))
}

/// Add an order to a transaction
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderDto,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Transaction or product not found"),
        (status = 409, description = "Insufficient stock")
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(service): State<Arc<OrderService>>,
    ValidatedJson(dto): ValidatedJson<CreateOrderDto>,
) -> Result<(StatusCode, Json<ApiResponse<OrderResponseDto>>)> {
    let order = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(order), None, None)),
    ))
}

/// Change an order's quantity
#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderDto,
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<OrderResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Insufficient stock")
    ),
    tag = "orders"
)]
pub async fn update_order(
    State(service): State<Arc<OrderService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateOrderDto>,
) -> Result<Json<ApiResponse<OrderResponseDto>>> {
    let order = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(order), None, None)))
}

/// Delete an order
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order deleted"),
        (status = 404, description = "Order not found")
    ),
    tag = "orders"
)]
pub async fn delete_order(
    State(service): State<Arc<OrderService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Order deleted".to_string()),
        None,
    )))
}
