use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::insights::dtos::{CreateInsightDto, InsightResponseDto};
use crate::features::insights::services::InsightService;
use crate::shared::types::ApiResponse;

/// Get the most recent insight
#[utoipa::path(
    get,
    path = "/api/insights/latest",
    responses(
        (status = 200, description = "Latest insight", body = ApiResponse<InsightResponseDto>),
        (status = 404, description = "No insights stored yet")
    ),
    tag = "insights"
)]
pub async fn get_latest_insight(
    State(service): State<Arc<InsightService>>,
) -> Result<Json<ApiResponse<InsightResponseDto>>> {
    let insight = service.get_latest().await?;
    Ok(Json(ApiResponse::success(Some(insight), None, None)))
}

/// Store an insight produced by the report service
#[utoipa::path(
    post,
    path = "/api/insights",
    request_body = CreateInsightDto,
    responses(
        (status = 201, description = "Insight stored", body = ApiResponse<InsightResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "insights"
)]
pub async fn create_insight(
    State(service): State<Arc<InsightService>>,
    ValidatedJson(dto): ValidatedJson<CreateInsightDto>,
) -> Result<(StatusCode, Json<ApiResponse<InsightResponseDto>>)> {
    let insight = service.save(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(insight),
            Some("Insight stored".to_string()),
            None,
        )),
    ))
}
