//! Transaction totals.
//!
//! `total_price = max(0, sum(price * quantity) - discount)`, rounded to cents, and
//! recomputed inside the database transaction that changed its inputs.

use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::core::error::{AppError, Result};

/// Total for order lines given as `(unit price, quantity)`
pub fn compute_total(lines: &[(Decimal, i32)], discount: Decimal) -> Decimal {
    let gross: Decimal = lines
        .iter()
        .map(|(price, quantity)| *price * Decimal::from(*quantity))
        .sum();

    (gross - discount).max(Decimal::ZERO).round_dp(2)
}

/// Recompute and store the total of one transaction
pub async fn recalculate(conn: &mut PgConnection, transaction_id: Uuid) -> Result<Decimal> {
    let discount: Decimal =
        sqlx::query_scalar("SELECT discount FROM transactions WHERE id = $1 FOR UPDATE")
            .bind(transaction_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                tracing::error!("Failed to lock transaction: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| {
                AppError::NotFound(format!("Transaction '{}' not found", transaction_id))
            })?;

    let lines: Vec<(Decimal, i32)> = sqlx::query_as(
        r#"
        SELECT p.price, o.quantity
        FROM orders o
        JOIN products p ON p.id = o.product_id
        WHERE o.transaction_id = $1
        "#,
    )
    .bind(transaction_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to load order lines: {:?}", e);
        AppError::Database(e)
    })?;

    let total = compute_total(&lines, discount);

    sqlx::query("UPDATE transactions SET total_price = $2, updated_at = NOW() WHERE id = $1")
        .bind(transaction_id)
        .bind(total)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to store transaction total"))?;

    tracing::debug!(
        "Transaction total recalculated: id={}, lines={}, total={}",
        transaction_id,
        lines.len(),
        total
    );

    Ok(total)
}

/// Recompute every transaction containing the product; returns how many were touched
pub async fn recalculate_for_product(conn: &mut PgConnection, product_id: Uuid) -> Result<usize> {
    let transaction_ids: Vec<Uuid> = sqlx::query_scalar(
        "SELECT DISTINCT transaction_id FROM orders WHERE product_id = $1 ORDER BY transaction_id",
    )
    .bind(product_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to find transactions for product: {:?}", e);
        AppError::Database(e)
    })?;

    for id in &transaction_ids {
        recalculate(conn, *id).await?;
    }

    Ok(transaction_ids.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_total_sums_lines_minus_discount() {
        let lines = [(dec("19.99"), 2), (dec("5.00"), 3)];
        assert_eq!(compute_total(&lines, dec("10.00")), dec("44.98"));
    }

    #[test]
    fn test_total_never_goes_below_zero() {
        let lines = [(dec("9.99"), 1)];
        assert_eq!(compute_total(&lines, dec("50")), Decimal::ZERO);
    }

    #[test]
    fn test_empty_transaction_totals_zero() {
        assert_eq!(compute_total(&[], Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_total_rounds_to_cents() {
        let lines = [(dec("0.3333"), 3)];
        assert_eq!(compute_total(&lines, Decimal::ZERO), dec("1.00"));
    }
}
