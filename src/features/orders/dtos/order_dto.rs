use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::orders::models::Order;

/// Request DTO for adding an order line to a transaction
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderDto {
    pub transaction_id: Uuid,
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// Request DTO for changing an order's quantity
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderDto {
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// Response DTO for an order
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponseDto {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponseDto {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            transaction_id: o.transaction_id,
            product_id: o.product_id,
            quantity: o.quantity,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_quantity_fails() {
        assert!(UpdateOrderDto { quantity: 0 }.validate().is_err());
        assert!(UpdateOrderDto { quantity: 1 }.validate().is_ok());
    }
}
