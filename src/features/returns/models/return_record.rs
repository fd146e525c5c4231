use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Return reason matching the `return_reason` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "return_reason")]
pub enum ReturnReason {
    #[sqlx(rename = "Product not received")]
    #[serde(rename = "Product not received")]
    ProductNotReceived,
    #[sqlx(rename = "Discrepancy with the description")]
    #[serde(rename = "Discrepancy with the description")]
    DiscrepancyWithDescription,
    #[sqlx(rename = "Faulty product")]
    #[serde(rename = "Faulty product")]
    FaultyProduct,
    Other,
}

impl ReturnReason {
    /// Whether the returned units come back into stock.
    ///
    /// A parcel that never arrived brings nothing back.
    pub fn restocks(self) -> bool {
        self != ReturnReason::ProductNotReceived
    }
}

impl std::fmt::Display for ReturnReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReturnReason::ProductNotReceived => write!(f, "Product not received"),
            ReturnReason::DiscrepancyWithDescription => {
                write!(f, "Discrepancy with the description")
            }
            ReturnReason::FaultyProduct => write!(f, "Faulty product"),
            ReturnReason::Other => write!(f, "Other"),
        }
    }
}

/// Return row joined with the returned product
#[derive(Debug, Clone, FromRow)]
pub struct ReturnWithProduct {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: Option<i32>,
    pub reason: ReturnReason,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Return row with the date of the transaction it belongs to
#[derive(Debug, Clone, FromRow)]
pub struct ReturnTimelineEntry {
    pub id: Uuid,
    pub order_id: Uuid,
    pub reason: ReturnReason,
    pub created_at: DateTime<Utc>,
    pub transaction_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_labels_round_trip_through_json() {
        let reason: ReturnReason = serde_json::from_str("\"Faulty product\"").unwrap();
        assert_eq!(reason, ReturnReason::FaultyProduct);
        assert_eq!(
            serde_json::to_string(&ReturnReason::ProductNotReceived).unwrap(),
            "\"Product not received\""
        );
    }

    #[test]
    fn test_only_undelivered_products_skip_restock() {
        assert!(!ReturnReason::ProductNotReceived.restocks());
        assert!(ReturnReason::FaultyProduct.restocks());
        assert!(ReturnReason::DiscrepancyWithDescription.restocks());
        assert!(ReturnReason::Other.restocks());
    }
}
