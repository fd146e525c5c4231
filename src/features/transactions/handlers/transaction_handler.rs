use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::transactions::dtos::{
    CreateTransactionDto, TransactionQueryParams, TransactionResponseDto, UpdateTransactionDto,
    UpdateTransactionStatusDto,
};
use crate::features::transactions::services::TransactionService;
use crate::shared::types::{ApiResponse, PaginationQuery};

/// List transactions (paginated, newest first)
#[utoipa::path(
    get,
    path = "/api/transactions",
    params(TransactionQueryParams),
    responses(
        (status = 200, description = "List of transactions", body = ApiResponse<Vec<TransactionResponseDto>>),
    ),
    tag = "transactions"
)]
pub async fn list_transactions(
    State(service): State<Arc<TransactionService>>,
    Query(params): Query<TransactionQueryParams>,
) -> Result<Json<ApiResponse<Vec<TransactionResponseDto>>>> {
    let page = service.list(&params).await?;
    Ok(Json(ApiResponse::page(page)))
}

/// List a client's transactions
#[utoipa::path(
    get,
    path = "/api/clients/{id}/transactions",
    params(
        ("id" = Uuid, Path, description = "Client ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Transactions of the client", body = ApiResponse<Vec<TransactionResponseDto>>),
        (status = 404, description = "Client not found")
    ),
    tag = "transactions"
)]
pub async fn list_client_transactions(
    State(service): State<Arc<TransactionService>>,
    Path(client_id): Path<Uuid>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<TransactionResponseDto>>>> {
    let page = service.list_by_client(client_id, &params).await?;
    Ok(Json(ApiResponse::page(page)))
}

/// Get a transaction with its order IDs
#[utoipa::path(
    get,
    path = "/api/transactions/{id}",
    params(
        ("id" = Uuid, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction found", body = ApiResponse<TransactionResponseDto>),
        (status = 404, description = "Transaction not found")
    ),
    tag = "transactions"
)]
pub async fn get_transaction(
    State(service): State<Arc<TransactionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransactionResponseDto>>> {
    let transaction = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(transaction), None, None)))
}

/// Open a transaction
#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = CreateTransactionDto,
    responses(
        (status = 201, description = "Transaction created", body = ApiResponse<TransactionResponseDto>),
        (status = 400, description = "Validation error or unknown client"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Insufficient stock for a moved order")
    ),
    tag = "transactions"
)]
pub async fn create_transaction(
    State(service): State<Arc<TransactionService>>,
    ValidatedJson(dto): ValidatedJson<CreateTransactionDto>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponseDto>>)> {
    let transaction = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(transaction), None, None)),
    ))
}

/// Replace a transaction's client, status, discount and date
#[utoipa::path(
    put,
    path = "/api/transactions/{id}",
    params(
        ("id" = Uuid, Path, description = "Transaction ID")
    ),
    request_body = UpdateTransactionDto,
    responses(
        (status = 200, description = "Transaction updated", body = ApiResponse<TransactionResponseDto>),
        (status = 400, description = "Validation error or unknown client"),
        (status = 404, description = "Transaction not found"),
        (status = 409, description = "Insufficient stock to leave cancelled")
    ),
    tag = "transactions"
)]
pub async fn update_transaction(
    State(service): State<Arc<TransactionService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateTransactionDto>,
) -> Result<Json<ApiResponse<TransactionResponseDto>>> {
    let transaction = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(transaction), None, None)))
}

/// Change a transaction's status
#[utoipa::path(
    patch,
    path = "/api/transactions/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Transaction ID")
    ),
    request_body = UpdateTransactionStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<TransactionResponseDto>),
        (status = 404, description = "Transaction not found"),
        (status = 409, description = "Insufficient stock to leave cancelled")
    ),
    tag = "transactions"
)]
pub async fn update_transaction_status(
    State(service): State<Arc<TransactionService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateTransactionStatusDto>,
) -> Result<Json<ApiResponse<TransactionResponseDto>>> {
    let transaction = service.update_status(id, dto.status).await?;
    Ok(Json(ApiResponse::success(Some(transaction), None, None)))
}

/// Attach an existing order to a transaction
#[utoipa::path(
    post,
    path = "/api/transactions/{id}/orders/{order_id}",
    params(
        ("id" = Uuid, Path, description = "Transaction ID"),
        ("order_id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order attached", body = ApiResponse<TransactionResponseDto>),
        (status = 404, description = "Transaction or order not found"),
        (status = 409, description = "Insufficient stock")
    ),
    tag = "transactions"
)]
pub async fn add_transaction_order(
    State(service): State<Arc<TransactionService>>,
    Path((id, order_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<TransactionResponseDto>>> {
    let transaction = service.add_order(id, order_id).await?;
    Ok(Json(ApiResponse::success(Some(transaction), None, None)))
}

/// Recompute a transaction's total
#[utoipa::path(
    post,
    path = "/api/transactions/{id}/recalculate",
    params(
        ("id" = Uuid, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Total recalculated", body = ApiResponse<TransactionResponseDto>),
        (status = 404, description = "Transaction not found")
    ),
    tag = "transactions"
)]
pub async fn recalculate_transaction(
    State(service): State<Arc<TransactionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransactionResponseDto>>> {
    let transaction = service.recalculate(id).await?;
    Ok(Json(ApiResponse::success(Some(transaction), None, None)))
}

/// Delete a transaction with its orders
#[utoipa::path(
    delete,
    path = "/api/transactions/{id}",
    params(
        ("id" = Uuid, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction deleted"),
        (status = 404, description = "Transaction not found")
    ),
    tag = "transactions"
)]
pub async fn delete_transaction(
    State(service): State<Arc<TransactionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Transaction deleted".to_string()),
        None,
    )))
}
