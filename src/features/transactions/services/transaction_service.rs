use std::collections::HashMap;

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::orders::models::{units_held, OrderHolding};
use crate::features::orders::services::holdings;
use crate::features::transactions::dtos::{
    CreateTransactionDto, TransactionQueryParams, TransactionResponseDto, UpdateTransactionDto,
};
use crate::features::transactions::models::{Transaction, TransactionStatus};
use crate::features::transactions::services::totals;
use crate::shared::types::{Page, Paginated, PaginationQuery};

const TRANSACTION_COLUMNS: &str = r#"
    id, client_id, status, total_price, discount, date, created_at, updated_at
"#;

/// Service for retail transactions and their totals
pub struct TransactionService {
    pool: PgPool,
}

impl TransactionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List transactions, newest first
    pub async fn list(
        &self,
        params: &TransactionQueryParams,
    ) -> Result<Page<TransactionResponseDto>> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM transactions
            WHERE ($1::transaction_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR client_id = $2)
            "#,
        )
        .bind(params.status)
        .bind(params.client_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count transactions: {:?}", e);
            AppError::Database(e)
        })?;

        let rows = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE ($1::transaction_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR client_id = $2)
            ORDER BY date DESC, id
            OFFSET $3 LIMIT $4
            "#
        ))
        .bind(params.status)
        .bind(params.client_id)
        .bind(params.offset())
        .bind(params.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list transactions: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(Page {
            items: self.with_order_ids(rows).await?,
            total,
        })
    }

    /// List one client's transactions, newest first
    pub async fn list_by_client(
        &self,
        client_id: Uuid,
        params: &PaginationQuery,
    ) -> Result<Page<TransactionResponseDto>> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)")
            .bind(client_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check client: {:?}", e);
                AppError::Database(e)
            })?;

        if !exists {
            return Err(AppError::NotFound(format!("Client '{}' not found", client_id)));
        }

        let query = TransactionQueryParams {
            page: params.page,
            page_size: params.page_size,
            status: None,
            client_id: Some(client_id),
        };
        self.list(&query).await
    }

    /// Get a transaction with its order IDs
    pub async fn get_by_id(&self, id: Uuid) -> Result<TransactionResponseDto> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get transaction by ID: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Transaction '{}' not found", id)))?;

        let mut conn = self.pool.acquire().await?;
        let order_ids = order_ids_of(&mut conn, id).await?;
        Ok(TransactionResponseDto::from_parts(transaction, order_ids))
    }

    /// Open a transaction, optionally moving existing orders into it
    pub async fn create(&self, dto: CreateTransactionDto) -> Result<TransactionResponseDto> {
        let mut tx = self.pool.begin().await?;

        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            INSERT INTO transactions (client_id, status, total_price, discount, date)
            VALUES ($1, $2, 0, $3, $4)
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(dto.client_id)
        .bind(dto.status.unwrap_or(TransactionStatus::Pending))
        .bind(dto.discount.round_dp(2))
        .bind(dto.date.unwrap_or_else(Utc::now))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to create transaction"))?;

        let mut sources = Vec::new();
        if !dto.order_ids.is_empty() {
            let locked = holdings::lock_transactions(&mut tx, &[], &dto.order_ids).await?;
            let orders = holdings::holdings_for_orders(&mut tx, &dto.order_ids).await?;
            if let Some(missing) = dto
                .order_ids
                .iter()
                .find(|id| !orders.iter().any(|o| o.id == **id))
            {
                return Err(AppError::NotFound(format!("Order '{}' not found", missing)));
            }

            for order in &orders {
                holdings::ensure_locked(order, &locked)?;
                if let Some(source) = move_order(&mut tx, order, &transaction).await? {
                    if !sources.contains(&source) {
                        sources.push(source);
                    }
                }
            }
        }
        for source in &sources {
            totals::recalculate(&mut tx, *source).await?;
        }
        totals::recalculate(&mut tx, transaction.id).await?;

        let response = load(&mut tx, transaction.id).await?;
        tx.commit().await?;

        tracing::info!(
            "Transaction created: id={}, client_id={}, orders={}, total={}",
            response.id,
            response.client_id,
            response.order_ids.len(),
            response.total_price
        );

        Ok(response)
    }

    /// Replace client, status, discount and date, then recompute the total
    pub async fn update(&self, id: Uuid, dto: UpdateTransactionDto) -> Result<TransactionResponseDto> {
        let mut tx = self.pool.begin().await?;

        let previous = lock(&mut tx, id).await?;
        if previous.status != dto.status {
            apply_status_change(&mut tx, id, dto.status).await?;
        }

        sqlx::query(
            r#"
            UPDATE transactions SET
                client_id = $2,
                status = $3,
                discount = $4,
                date = COALESCE($5, date),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(dto.client_id)
        .bind(dto.status)
        .bind(dto.discount.round_dp(2))
        .bind(dto.date)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to update transaction"))?;

        totals::recalculate(&mut tx, id).await?;

        let response = load(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(
            "Transaction updated: id={}, status={}, total={}",
            id,
            response.status,
            response.total_price
        );

        Ok(response)
    }

    /// Change the status, moving stock when entering or leaving `cancelled`
    pub async fn update_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
    ) -> Result<TransactionResponseDto> {
        let mut tx = self.pool.begin().await?;

        let previous = lock(&mut tx, id).await?;
        if previous.status != status {
            apply_status_change(&mut tx, id, status).await?;

            sqlx::query("UPDATE transactions SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::from_db(e, "Failed to update transaction status"))?;

            tracing::info!(
                "Transaction status changed: id={}, {} -> {}",
                id,
                previous.status,
                status
            );
        }

        let response = load(&mut tx, id).await?;
        tx.commit().await?;

        Ok(response)
    }

    /// Move an order into this transaction; a no-op when it already belongs here
    pub async fn add_order(&self, id: Uuid, order_id: Uuid) -> Result<TransactionResponseDto> {
        let mut tx = self.pool.begin().await?;

        let locked = holdings::lock_transactions(&mut tx, &[id], &[order_id]).await?;
        let transaction = lock(&mut tx, id).await?;
        let order = holdings::holding_for_order(&mut tx, order_id).await?;
        holdings::ensure_locked(&order, &locked)?;

        if let Some(source) = move_order(&mut tx, &order, &transaction).await? {
            totals::recalculate(&mut tx, source).await?;
            totals::recalculate(&mut tx, id).await?;

            tracing::info!(
                "Order moved: order_id={}, from={}, to={}",
                order_id,
                source,
                id
            );
        }

        let response = load(&mut tx, id).await?;
        tx.commit().await?;

        Ok(response)
    }

    /// Recompute the stored total from the current orders and prices
    pub async fn recalculate(&self, id: Uuid) -> Result<TransactionResponseDto> {
        let mut tx = self.pool.begin().await?;

        let total = totals::recalculate(&mut tx, id).await?;
        let response = load(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!("Transaction recalculated: id={}, total={}", id, total);

        Ok(response)
    }

    /// Delete a transaction with its orders and their returns, restocking what they held
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        lock(&mut tx, id).await?;

        let orders = holdings::holdings_for_transaction(&mut tx, id).await?;
        for order in &orders {
            holdings::settle(&mut tx, order.product_id, order.held(), 0).await?;
        }

        sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_db(e, "Failed to delete transaction"))?;

        tx.commit().await?;

        tracing::info!("Transaction deleted: id={}, orders={}", id, orders.len());
        Ok(())
    }

    async fn with_order_ids(&self, rows: Vec<Transaction>) -> Result<Vec<TransactionResponseDto>> {
        let ids: Vec<Uuid> = rows.iter().map(|t| t.id).collect();

        let pairs: Vec<(Uuid, Uuid)> = sqlx::query_as(
            r#"
            SELECT transaction_id, id
            FROM orders
            WHERE transaction_id = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load transaction orders: {:?}", e);
            AppError::Database(e)
        })?;

        let mut by_transaction: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (transaction_id, order_id) in pairs {
            by_transaction.entry(transaction_id).or_default().push(order_id);
        }

        Ok(rows
            .into_iter()
            .map(|t| {
                let order_ids = by_transaction.remove(&t.id).unwrap_or_default();
                TransactionResponseDto::from_parts(t, order_ids)
            })
            .collect())
    }
}

async fn lock(conn: &mut PgConnection, id: Uuid) -> Result<Transaction> {
    sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to lock transaction: {:?}", e);
        AppError::Database(e)
    })?
    .ok_or_else(|| AppError::NotFound(format!("Transaction '{}' not found", id)))
}

async fn load(conn: &mut PgConnection, id: Uuid) -> Result<TransactionResponseDto> {
    let transaction = lock(conn, id).await?;
    let order_ids = order_ids_of(conn, id).await?;
    Ok(TransactionResponseDto::from_parts(transaction, order_ids))
}

async fn order_ids_of(conn: &mut PgConnection, transaction_id: Uuid) -> Result<Vec<Uuid>> {
    sqlx::query_scalar("SELECT id FROM orders WHERE transaction_id = $1 ORDER BY created_at, id")
        .bind(transaction_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load order IDs: {:?}", e);
            AppError::Database(e)
        })
}

/// Move stock for every order of a transaction entering `next`
async fn apply_status_change(
    conn: &mut PgConnection,
    transaction_id: Uuid,
    next: TransactionStatus,
) -> Result<()> {
    let orders = holdings::holdings_for_transaction(conn, transaction_id).await?;
    for order in &orders {
        let after = units_held(next, order.quantity, order.return_reason);
        holdings::settle(conn, order.product_id, order.held(), after).await?;
    }
    Ok(())
}

/// Re-parent a locked order, moving stock if the two transactions hold it differently.
///
/// Returns the previous transaction, or `None` when the order already belonged to `target`.
async fn move_order(
    conn: &mut PgConnection,
    order: &OrderHolding,
    target: &Transaction,
) -> Result<Option<Uuid>> {
    if order.transaction_id == target.id {
        return Ok(None);
    }

    let after = units_held(target.status, order.quantity, order.return_reason);
    holdings::settle(conn, order.product_id, order.held(), after).await?;

    sqlx::query("UPDATE orders SET transaction_id = $2, updated_at = NOW() WHERE id = $1")
        .bind(order.id)
        .bind(target.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to move order"))?;

    Ok(Some(order.transaction_id))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::features::orders::dtos::CreateOrderDto;
    use crate::features::orders::services::OrderService;
    use crate::shared::test_helpers::{
        dec, insert_client, insert_product, insert_transaction, stock_of, total_of,
    };

    #[sqlx::test]
    async fn test_add_order_moves_it_and_recomputes_both_totals(pool: PgPool) {
        let client = insert_client(&pool, "Anna Nowak", "anna@example.com").await;
        let product = insert_product(&pool, "Helmet", "12.50", 10).await;
        let source = insert_transaction(&pool, client, TransactionStatus::Pending).await;
        let target = insert_transaction(&pool, client, TransactionStatus::Completed).await;

        let order = OrderService::new(pool.clone())
            .create(CreateOrderDto {
                transaction_id: source,
                product_id: product,
                quantity: 2,
            })
            .await
            .unwrap();
        assert_eq!(total_of(&pool, source).await, dec("25.00"));

        let service = TransactionService::new(pool.clone());
        let moved = service.add_order(target, order.id).await.unwrap();

        assert_eq!(moved.order_ids, vec![order.id]);
        assert_eq!(moved.total_price, dec("25.00"));
        assert_eq!(total_of(&pool, source).await, Decimal::ZERO);
        assert!(service.get_by_id(source).await.unwrap().order_ids.is_empty());
        assert_eq!(stock_of(&pool, product).await, 8);

        // Moving into the transaction it already belongs to changes nothing
        let again = service.add_order(target, order.id).await.unwrap();
        assert_eq!(again.total_price, dec("25.00"));
        assert_eq!(stock_of(&pool, product).await, 8);
    }

    #[sqlx::test]
    async fn test_moving_into_cancelled_transaction_restocks(pool: PgPool) {
        let client = insert_client(&pool, "Anna Nowak", "anna@example.com").await;
        let product = insert_product(&pool, "Helmet", "12.50", 10).await;
        let source = insert_transaction(&pool, client, TransactionStatus::Pending).await;
        let cancelled = insert_transaction(&pool, client, TransactionStatus::Cancelled).await;

        let order = OrderService::new(pool.clone())
            .create(CreateOrderDto {
                transaction_id: source,
                product_id: product,
                quantity: 3,
            })
            .await
            .unwrap();
        assert_eq!(stock_of(&pool, product).await, 7);

        TransactionService::new(pool.clone())
            .add_order(cancelled, order.id)
            .await
            .unwrap();
        assert_eq!(stock_of(&pool, product).await, 10);
    }

    #[sqlx::test]
    async fn test_add_missing_order_is_not_found(pool: PgPool) {
        let client = insert_client(&pool, "Anna Nowak", "anna@example.com").await;
        let target = insert_transaction(&pool, client, TransactionStatus::Pending).await;

        let err = TransactionService::new(pool.clone())
            .add_order(target, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[sqlx::test]
    async fn test_cancel_and_reopen_moves_stock(pool: PgPool) {
        let client = insert_client(&pool, "Anna Nowak", "anna@example.com").await;
        let product = insert_product(&pool, "Helmet", "12.50", 4).await;
        let transaction = insert_transaction(&pool, client, TransactionStatus::Pending).await;

        OrderService::new(pool.clone())
            .create(CreateOrderDto {
                transaction_id: transaction,
                product_id: product,
                quantity: 4,
            })
            .await
            .unwrap();
        assert_eq!(stock_of(&pool, product).await, 0);

        let service = TransactionService::new(pool.clone());
        service
            .update_status(transaction, TransactionStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(stock_of(&pool, product).await, 4);

        service
            .update_status(transaction, TransactionStatus::Completed)
            .await
            .unwrap();
        assert_eq!(stock_of(&pool, product).await, 0);
    }

    #[sqlx::test]
    async fn test_create_takes_over_existing_orders(pool: PgPool) {
        let client = insert_client(&pool, "Anna Nowak", "anna@example.com").await;
        let rope = insert_product(&pool, "Rope", "40.00", 5).await;
        let helmet = insert_product(&pool, "Helmet", "12.50", 5).await;
        let source = insert_transaction(&pool, client, TransactionStatus::Pending).await;

        let orders = OrderService::new(pool.clone());
        let mut order_ids = Vec::new();
        for product_id in [rope, helmet] {
            let order = orders
                .create(CreateOrderDto {
                    transaction_id: source,
                    product_id,
                    quantity: 1,
                })
                .await
                .unwrap();
            order_ids.push(order.id);
        }

        let created = TransactionService::new(pool.clone())
            .create(CreateTransactionDto {
                client_id: client,
                status: None,
                discount: dec("2.50"),
                date: None,
                order_ids: order_ids.clone(),
            })
            .await
            .unwrap();

        assert_eq!(created.order_ids.len(), 2);
        assert_eq!(created.total_price, dec("50.00"));
        assert_eq!(total_of(&pool, source).await, Decimal::ZERO);
        assert_eq!(stock_of(&pool, rope).await, 4);
        assert_eq!(stock_of(&pool, helmet).await, 4);
    }
}
