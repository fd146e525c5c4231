use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::orders::dtos::{CreateOrderDto, OrderResponseDto, UpdateOrderDto};
use crate::features::orders::models::{units_held, Order};
use crate::features::orders::services::holdings;
use crate::features::products::services::stock;
use crate::features::transactions::models::TransactionStatus;
use crate::features::transactions::services::totals;
use crate::shared::types::{Page, Paginated, PaginationQuery};

const ORDER_COLUMNS: &str = "id, transaction_id, product_id, quantity, created_at, updated_at";

/// Which parent an order listing is scoped to
#[derive(Debug, Clone, Copy)]
pub enum OrderScope {
    All,
    Transaction(Uuid),
    Product(Uuid),
}

/// Service for order lines and the stock they hold
pub struct OrderService {
    pool: PgPool,
}

impl OrderService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List orders, newest first, optionally scoped to a transaction or product
    pub async fn list(
        &self,
        scope: OrderScope,
        params: &PaginationQuery,
    ) -> Result<Page<OrderResponseDto>> {
        let (transaction_id, product_id) = match scope {
            OrderScope::All => (None, None),
            OrderScope::Transaction(id) => {
                self.ensure_exists("transactions", "Transaction", id).await?;
                (Some(id), None)
            }
            OrderScope::Product(id) => {
                self.ensure_exists("products", "Product", id).await?;
                (None, Some(id))
            }
        };

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM orders
            WHERE ($1::uuid IS NULL OR transaction_id = $1)
              AND ($2::uuid IS NULL OR product_id = $2)
            "#,
        )
        .bind(transaction_id)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count orders: {:?}", e);
            AppError::Database(e)
        })?;

        let rows = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE ($1::uuid IS NULL OR transaction_id = $1)
              AND ($2::uuid IS NULL OR product_id = $2)
            ORDER BY created_at DESC, id
            OFFSET $3 LIMIT $4
            "#
        ))
        .bind(transaction_id)
        .bind(product_id)
        .bind(params.offset())
        .bind(params.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list orders: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    /// Get an order by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<OrderResponseDto> {
        sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get order by ID: {:?}", e);
                AppError::Database(e)
            })?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Order '{}' not found", id)))
    }

    /// Add an order, reserving stock unless the transaction is cancelled
    pub async fn create(&self, dto: CreateOrderDto) -> Result<OrderResponseDto> {
        let mut tx = self.pool.begin().await?;

        let status: TransactionStatus =
            sqlx::query_scalar("SELECT status FROM transactions WHERE id = $1 FOR UPDATE")
                .bind(dto.transaction_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to lock transaction: {:?}", e);
                    AppError::Database(e)
                })?
                .ok_or_else(|| {
                    AppError::NotFound(format!(
                        "Transaction '{}' not found",
                        dto.transaction_id
                    ))
                })?;

        stock::reserve(&mut tx, dto.product_id, units_held(status, dto.quantity, None)).await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (transaction_id, product_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(dto.transaction_id)
        .bind(dto.product_id)
        .bind(dto.quantity)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to create order"))?;

        let total = totals::recalculate(&mut tx, order.transaction_id).await?;
        tx.commit().await?;

        tracing::info!(
            "Order created: id={}, transaction_id={}, product_id={}, quantity={}, transaction_total={}",
            order.id,
            order.transaction_id,
            order.product_id,
            order.quantity,
            total
        );

        Ok(order.into())
    }

    /// Change the quantity, moving stock by the difference
    pub async fn update(&self, id: Uuid, dto: UpdateOrderDto) -> Result<OrderResponseDto> {
        let mut tx = self.pool.begin().await?;

        let holding = holdings::lock_order(&mut tx, id).await?;
        let after = units_held(holding.status, dto.quantity, holding.return_reason);
        holdings::settle(&mut tx, holding.product_id, holding.held(), after).await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders SET quantity = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(dto.quantity)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to update order"))?;

        totals::recalculate(&mut tx, order.transaction_id).await?;
        tx.commit().await?;

        tracing::info!(
            "Order updated: id={}, quantity {} -> {}",
            id,
            holding.quantity,
            order.quantity
        );

        Ok(order.into())
    }

    /// Delete an order and its return, restocking what it still held
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let holding = holdings::lock_order(&mut tx, id).await?;
        holdings::settle(&mut tx, holding.product_id, holding.held(), 0).await?;

        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_db(e, "Failed to delete order"))?;

        totals::recalculate(&mut tx, holding.transaction_id).await?;
        tx.commit().await?;

        tracing::info!(
            "Order deleted: id={}, transaction_id={}, restocked={}",
            id,
            holding.transaction_id,
            holding.held()
        );
        Ok(())
    }

    async fn ensure_exists(&self, table: &str, label: &str, id: Uuid) -> Result<()> {
        let exists: bool =
            sqlx::query_scalar(&format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)"))
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to check {}: {:?}", table, e);
                    AppError::Database(e)
                })?;

        if !exists {
            return Err(AppError::NotFound(format!("{} '{}' not found", label, id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use super::*;
    use crate::features::products::dtos::UpdateProductDto;
    use crate::features::products::services::ProductService;
    use crate::shared::test_helpers::{
        dec, insert_client, insert_product, insert_transaction, stock_of, total_of,
    };

    #[sqlx::test]
    async fn test_orders_never_overdraw_stock(pool: PgPool) {
        let client = insert_client(&pool, "Anna Nowak", "anna@example.com").await;
        let product = insert_product(&pool, "Crampons", "10.00", 5).await;
        let transaction = insert_transaction(&pool, client, TransactionStatus::Pending).await;
        let service = OrderService::new(pool.clone());

        let err = service
            .create(CreateOrderDto {
                transaction_id: transaction,
                product_id: product,
                quantity: 6,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(stock_of(&pool, product).await, 5);

        let order = service
            .create(CreateOrderDto {
                transaction_id: transaction,
                product_id: product,
                quantity: 3,
            })
            .await
            .unwrap();
        assert_eq!(stock_of(&pool, product).await, 2);
        assert_eq!(total_of(&pool, transaction).await, dec("30.00"));

        let err = service
            .update(order.id, UpdateOrderDto { quantity: 8 })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(stock_of(&pool, product).await, 2);

        service
            .update(order.id, UpdateOrderDto { quantity: 5 })
            .await
            .unwrap();
        assert_eq!(stock_of(&pool, product).await, 0);
        assert_eq!(total_of(&pool, transaction).await, dec("50.00"));

        service.delete(order.id).await.unwrap();
        assert_eq!(stock_of(&pool, product).await, 5);
        assert_eq!(total_of(&pool, transaction).await, Decimal::ZERO);
    }

    #[sqlx::test]
    async fn test_cancelled_transaction_orders_hold_no_stock(pool: PgPool) {
        let client = insert_client(&pool, "Anna Nowak", "anna@example.com").await;
        let product = insert_product(&pool, "Crampons", "10.00", 1).await;
        let transaction = insert_transaction(&pool, client, TransactionStatus::Cancelled).await;
        let service = OrderService::new(pool.clone());

        let order = service
            .create(CreateOrderDto {
                transaction_id: transaction,
                product_id: product,
                quantity: 4,
            })
            .await
            .unwrap();
        assert_eq!(stock_of(&pool, product).await, 1);

        service.delete(order.id).await.unwrap();
        assert_eq!(stock_of(&pool, product).await, 1);
    }

    #[sqlx::test]
    async fn test_concurrent_orders_and_price_changes_all_commit(pool: PgPool) {
        let client = insert_client(&pool, "Anna Nowak", "anna@example.com").await;
        let product = insert_product(&pool, "Crampons", "10.00", 1000).await;
        let mut transactions = Vec::new();
        for _ in 0..4 {
            transactions.push(insert_transaction(&pool, client, TransactionStatus::Pending).await);
        }

        let orders = Arc::new(OrderService::new(pool.clone()));
        let products = Arc::new(ProductService::new(pool.clone()));

        // Price changes must recalculate a transaction that already holds the product
        orders
            .create(CreateOrderDto {
                transaction_id: transactions[0],
                product_id: product,
                quantity: 1,
            })
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..100 {
            let orders = orders.clone();
            let products = products.clone();
            let transaction_id = transactions[i % transactions.len()];
            handles.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    orders
                        .create(CreateOrderDto {
                            transaction_id,
                            product_id: product,
                            quantity: 1,
                        })
                        .await
                        .map(|_| ())
                } else {
                    products
                        .update(
                            product,
                            UpdateProductDto {
                                price: Some(Decimal::from(10 + i as i64)),
                                ..Default::default()
                            },
                        )
                        .await
                        .map(|_| ())
                }
            }));
        }

        for handle in handles {
            let result = handle.await.unwrap();
            assert!(result.is_ok(), "operation failed: {:?}", result);
        }

        assert_eq!(stock_of(&pool, product).await, 1000 - 51);

        let price = products.get_by_id(product).await.unwrap().price;
        for transaction_id in &transactions {
            let count: i64 = sqlx::query_scalar(
                "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM orders WHERE transaction_id = $1",
            )
            .bind(transaction_id)
            .fetch_one(&pool)
            .await
            .unwrap();
            assert_eq!(total_of(&pool, *transaction_id).await, price * Decimal::from(count));
        }
    }
}
