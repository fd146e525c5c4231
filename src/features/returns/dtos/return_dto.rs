use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::returns::models::{ReturnReason, ReturnTimelineEntry, ReturnWithProduct};

/// Request DTO for registering a return
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReturnDto {
    pub order_id: Uuid,
    pub reason: ReturnReason,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: String,
}

/// Request DTO for a partial return update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateReturnDto {
    pub reason: Option<ReturnReason>,
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,
}

/// Response DTO for a return
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReturnResponseDto {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    /// `"Unknown Product"` when the product cannot be resolved
    pub product_name: String,
    pub quantity: Option<i32>,
    pub reason: ReturnReason,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReturnWithProduct> for ReturnResponseDto {
    fn from(r: ReturnWithProduct) -> Self {
        Self {
            id: r.id,
            order_id: r.order_id,
            product_id: r.product_id,
            product_name: r.product_name,
            quantity: r.quantity,
            reason: r.reason,
            description: r.description,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// A return placed on the date of its transaction
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReturnTimelineDto {
    pub id: Uuid,
    pub order_id: Uuid,
    pub reason: ReturnReason,
    pub created_at: DateTime<Utc>,
    pub transaction_date: DateTime<Utc>,
}

impl From<ReturnTimelineEntry> for ReturnTimelineDto {
    fn from(r: ReturnTimelineEntry) -> Self {
        Self {
            id: r.id,
            order_id: r.order_id,
            reason: r.reason,
            created_at: r.created_at,
            transaction_date: r.transaction_date,
        }
    }
}
