use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::transactions::models::{Transaction, TransactionStatus};
use crate::shared::types::{default_page, default_page_size, impl_paginated};
use crate::shared::validation::validate_non_negative_money;

/// Request DTO for opening a transaction
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTransactionDto {
    pub client_id: Uuid,
    /// Defaults to `pending`
    pub status: Option<TransactionStatus>,
    #[serde(default)]
    #[schema(value_type = String, example = "5.00")]
    #[validate(custom(function = "validate_non_negative_money"))]
    pub discount: Decimal,
    /// Defaults to the time of the request
    pub date: Option<DateTime<Utc>>,
    /// Existing orders to move into the new transaction
    #[serde(default)]
    pub order_ids: Vec<Uuid>,
}

/// Request DTO for replacing a transaction's editable fields
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTransactionDto {
    pub client_id: Uuid,
    pub status: TransactionStatus,
    #[schema(value_type = String, example = "0.00")]
    #[validate(custom(function = "validate_non_negative_money"))]
    pub discount: Decimal,
    /// Kept unchanged when omitted
    pub date: Option<DateTime<Utc>>,
}

/// Request DTO for changing only the status
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTransactionStatusDto {
    pub status: TransactionStatus,
}

/// Query params for listing transactions
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct TransactionQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    pub status: Option<TransactionStatus>,
    pub client_id: Option<Uuid>,
}

impl_paginated!(TransactionQueryParams);

/// Response DTO for a transaction
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponseDto {
    pub id: Uuid,
    pub client_id: Uuid,
    pub status: TransactionStatus,
    #[schema(value_type = String, example = "44.98")]
    pub total_price: Decimal,
    #[schema(value_type = String, example = "5.00")]
    pub discount: Decimal,
    pub date: DateTime<Utc>,
    pub order_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionResponseDto {
    pub fn from_parts(t: Transaction, order_ids: Vec<Uuid>) -> Self {
        Self {
            id: t.id,
            client_id: t.client_id,
            status: t.status,
            total_price: t.total_price,
            discount: t.discount,
            date: t.date,
            order_ids,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults() {
        let dto: CreateTransactionDto = serde_json::from_str(&format!(
            r#"{{"client_id": "{}"}}"#,
            Uuid::new_v4()
        ))
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.discount, Decimal::ZERO);
        assert!(dto.order_ids.is_empty());
        assert!(dto.status.is_none());
    }

    #[test]
    fn test_negative_discount_fails() {
        let dto = UpdateTransactionDto {
            client_id: Uuid::new_v4(),
            status: TransactionStatus::Pending,
            discount: "-0.50".parse().unwrap(),
            date: None,
        };
        assert!(dto.validate().is_err());
    }
}
