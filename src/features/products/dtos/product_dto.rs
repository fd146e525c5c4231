use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::products::models::Product;
use crate::shared::types::{default_page, default_page_size, impl_paginated};
use crate::shared::validation::{validate_non_negative_money, validate_not_blank};

/// Request DTO for adding a product
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductDto {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[schema(value_type = String, example = "49.99")]
    #[validate(custom(function = "validate_non_negative_money"))]
    pub price: Decimal,
    /// Initial stock, defaults to 0
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: i32,
    /// Image URL, may be empty
    #[serde(default)]
    #[validate(length(max = 2048, message = "Image URL must not exceed 2048 characters"))]
    pub image: String,
}

/// Request DTO for a partial product update. Stock changes go through the stock endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProductDto {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[schema(value_type = Option<String>, example = "44.99")]
    #[validate(custom(function = "validate_non_negative_money"))]
    pub price: Option<Decimal>,
    #[validate(length(max = 2048, message = "Image URL must not exceed 2048 characters"))]
    pub image: Option<String>,
}

/// Request DTO for a relative stock change
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateStockDto {
    /// Positive to restock, negative to remove
    pub amount_change: i32,
}

/// Query params for listing products
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ProductQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// Case-insensitive search in the name
    pub search: Option<String>,
}

impl_paginated!(ProductQueryParams);

/// Response DTO for a product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponseDto {
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = String, example = "49.99")]
    pub price: Decimal,
    pub stock: i32,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponseDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            price: p.price,
            stock: p.stock,
            image: p.image,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
