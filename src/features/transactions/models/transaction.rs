use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Transaction status matching the `transaction_status` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "transaction_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
}

impl TransactionStatus {
    /// Whether the orders of a transaction in this status keep their units out of stock
    pub fn holds_stock(self) -> bool {
        self != TransactionStatus::Cancelled
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Completed => write!(f, "completed"),
            TransactionStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Database model for a retail transaction
#[derive(Debug, Clone, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub client_id: Uuid,
    pub status: TransactionStatus,
    pub total_price: Decimal,
    pub discount: Decimal,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_cancelled_releases_stock() {
        assert!(TransactionStatus::Pending.holds_stock());
        assert!(TransactionStatus::Completed.holds_stock());
        assert!(!TransactionStatus::Cancelled.holds_stock());
    }

    #[test]
    fn test_status_wire_format() {
        let status: TransactionStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, TransactionStatus::Cancelled);
        assert_eq!(status.to_string(), "cancelled");
    }
}
