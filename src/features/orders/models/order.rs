use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::returns::models::ReturnReason;
use crate::features::transactions::models::TransactionStatus;

/// Database model for an order line
#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order together with everything that decides how much stock it holds
#[derive(Debug, Clone, FromRow)]
pub struct OrderHolding {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub status: TransactionStatus,
    pub return_reason: Option<ReturnReason>,
}

impl OrderHolding {
    pub fn held(&self) -> i32 {
        units_held(self.status, self.quantity, self.return_reason)
    }
}

/// Units an order keeps out of stock.
///
/// Every stock movement in the order flow is the difference of this value before
/// and after a change.
pub fn units_held(
    status: TransactionStatus,
    quantity: i32,
    return_reason: Option<ReturnReason>,
) -> i32 {
    let returned = return_reason.is_some_and(ReturnReason::restocks);
    if status.holds_stock() && !returned {
        quantity
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_order_holds_its_quantity() {
        assert_eq!(units_held(TransactionStatus::Pending, 3, None), 3);
        assert_eq!(units_held(TransactionStatus::Completed, 3, None), 3);
    }

    #[test]
    fn test_cancelled_order_holds_nothing() {
        assert_eq!(units_held(TransactionStatus::Cancelled, 3, None), 0);
        assert_eq!(
            units_held(TransactionStatus::Cancelled, 3, Some(ReturnReason::ProductNotReceived)),
            0
        );
    }

    #[test]
    fn test_restocking_return_releases_units() {
        assert_eq!(
            units_held(TransactionStatus::Completed, 2, Some(ReturnReason::FaultyProduct)),
            0
        );
    }

    #[test]
    fn test_undelivered_return_keeps_units_consumed() {
        assert_eq!(
            units_held(TransactionStatus::Completed, 2, Some(ReturnReason::ProductNotReceived)),
            2
        );
    }
}
