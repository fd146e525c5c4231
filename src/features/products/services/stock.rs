//! Stock bookkeeping shared by the order, transaction and return flows.
//!
//! Every function runs on a connection borrowed from an open database transaction
//! and locks the product row before reading its stock. Stock never goes negative.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::core::error::{AppError, Result};

/// Apply a relative change to a stock level
pub fn apply_stock_change(current: i32, delta: i32) -> Result<i32> {
    let next = current
        .checked_add(delta)
        .ok_or_else(|| AppError::BadRequest(format!("Stock change {} is out of range", delta)))?;

    if next < 0 {
        return Err(AppError::Conflict(format!(
            "Insufficient stock: {} available, {} requested",
            current, -delta
        )));
    }
    Ok(next)
}

/// Change a product's stock by `delta` and return the new level
pub async fn adjust_stock(conn: &mut PgConnection, product_id: Uuid, delta: i32) -> Result<i32> {
    let current: i32 = sqlx::query_scalar("SELECT stock FROM products WHERE id = $1 FOR UPDATE")
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to lock product stock: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", product_id)))?;

    if delta == 0 {
        return Ok(current);
    }

    let next = apply_stock_change(current, delta)?;

    sqlx::query("UPDATE products SET stock = $2, updated_at = NOW() WHERE id = $1")
        .bind(product_id)
        .bind(next)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to update product stock"))?;

    tracing::info!(
        "Stock adjusted: product_id={}, {} -> {}",
        product_id,
        current,
        next
    );

    Ok(next)
}

/// Take `quantity` units out of stock
pub async fn reserve(conn: &mut PgConnection, product_id: Uuid, quantity: i32) -> Result<i32> {
    adjust_stock(conn, product_id, -quantity).await
}
