//! Locked reads of the stock an order holds.
//!
//! Callers change an order, its transaction status or its return, then move stock
//! by `before.held() - after` through [`stock::adjust_stock`].
//!
//! Retail rows are always locked in the same order: transactions by ascending id,
//! then orders, then products by ascending id, then returns.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::orders::models::OrderHolding;
use crate::features::products::services::stock;

const HOLDING_SELECT: &str = r#"
    SELECT o.id, o.transaction_id, o.product_id, o.quantity, t.status, r.reason AS return_reason
    FROM orders o
    JOIN transactions t ON t.id = o.transaction_id
    LEFT JOIN returns r ON r.order_id = o.id
"#;

/// Lock transactions by ascending id and return the ids that exist.
///
/// Covers the transactions named in `transaction_ids` and those owning `order_ids`.
pub async fn lock_transactions(
    conn: &mut PgConnection,
    transaction_ids: &[Uuid],
    order_ids: &[Uuid],
) -> Result<Vec<Uuid>> {
    sqlx::query_scalar(
        r#"
        SELECT id FROM transactions
        WHERE id = ANY($1)
           OR id IN (SELECT transaction_id FROM orders WHERE id = ANY($2))
        ORDER BY id
        FOR UPDATE
        "#,
    )
    .bind(transaction_ids)
    .bind(order_ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to lock transactions: {:?}", e);
        AppError::Database(e)
    })
}

/// Lock the transactions holding a product, by ascending id
pub async fn lock_transactions_for_product(
    conn: &mut PgConnection,
    product_id: Uuid,
) -> Result<Vec<Uuid>> {
    sqlx::query_scalar(
        r#"
        SELECT id FROM transactions
        WHERE id IN (SELECT transaction_id FROM orders WHERE product_id = $1)
        ORDER BY id
        FOR UPDATE
        "#,
    )
    .bind(product_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to lock transactions for product: {:?}", e);
        AppError::Database(e)
    })
}

/// Fail when an order left the transactions locked before it
pub fn ensure_locked(holding: &OrderHolding, locked: &[Uuid]) -> Result<()> {
    if locked.contains(&holding.transaction_id) {
        Ok(())
    } else {
        Err(AppError::Conflict(format!(
            "Order '{}' moved to another transaction, retry the request",
            holding.id
        )))
    }
}

/// Lock an order's transaction, then the order, and read what it holds
pub async fn lock_order(conn: &mut PgConnection, order_id: Uuid) -> Result<OrderHolding> {
    let locked = lock_transactions(conn, &[], &[order_id]).await?;
    let holding = holding_for_order(conn, order_id).await?;
    ensure_locked(&holding, &locked)?;
    Ok(holding)
}

/// Lock one order and read what it holds.
///
/// The owning transaction must already be locked; see [`lock_order`].
pub async fn holding_for_order(conn: &mut PgConnection, order_id: Uuid) -> Result<OrderHolding> {
    sqlx::query_as::<_, OrderHolding>(&format!(
        "{HOLDING_SELECT} WHERE o.id = $1 FOR UPDATE OF o"
    ))
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to lock order: {:?}", e);
        AppError::Database(e)
    })?
    .ok_or_else(|| AppError::NotFound(format!("Order '{}' not found", order_id)))
}

/// Lock several orders by product and read what each holds.
///
/// Missing orders are skipped; callers compare against the ids they asked for.
pub async fn holdings_for_orders(
    conn: &mut PgConnection,
    order_ids: &[Uuid],
) -> Result<Vec<OrderHolding>> {
    sqlx::query_as::<_, OrderHolding>(&format!(
        "{HOLDING_SELECT} WHERE o.id = ANY($1) ORDER BY o.product_id, o.id FOR UPDATE OF o"
    ))
    .bind(order_ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to lock orders: {:?}", e);
        AppError::Database(e)
    })
}

/// Lock every order of a transaction and read what each holds
pub async fn holdings_for_transaction(
    conn: &mut PgConnection,
    transaction_id: Uuid,
) -> Result<Vec<OrderHolding>> {
    sqlx::query_as::<_, OrderHolding>(&format!(
        "{HOLDING_SELECT} WHERE o.transaction_id = $1 ORDER BY o.product_id, o.id FOR UPDATE OF o"
    ))
    .bind(transaction_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to lock transaction orders: {:?}", e);
        AppError::Database(e)
    })
}

/// Move stock for an order whose held units go from `before` to `after`
pub async fn settle(
    conn: &mut PgConnection,
    product_id: Uuid,
    before: i32,
    after: i32,
) -> Result<()> {
    stock::adjust_stock(conn, product_id, before - after).await?;
    Ok(())
}
