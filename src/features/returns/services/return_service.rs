use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::orders::models::units_held;
use crate::features::orders::services::holdings;
use crate::features::returns::dtos::{
    CreateReturnDto, ReturnResponseDto, ReturnTimelineDto, UpdateReturnDto,
};
use crate::features::returns::models::{ReturnTimelineEntry, ReturnWithProduct};
use crate::shared::constants::UNKNOWN_PRODUCT;
use crate::shared::types::{Page, Paginated, PaginationQuery};

// `$1` is the fallback product name
const RETURN_SELECT: &str = r#"
    SELECT r.id, r.order_id, o.product_id, COALESCE(p.name, $1) AS product_name,
           o.quantity, r.reason, r.description, r.created_at, r.updated_at
    FROM returns r
    LEFT JOIN orders o ON o.id = r.order_id
    LEFT JOIN products p ON p.id = o.product_id
"#;

/// Service for returns and the stock they bring back
pub struct ReturnService {
    pool: PgPool,
}

impl ReturnService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List returns with product names, newest first
    pub async fn list(&self, params: &PaginationQuery) -> Result<Page<ReturnResponseDto>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM returns")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count returns: {:?}", e);
                AppError::Database(e)
            })?;

        let rows = sqlx::query_as::<_, ReturnWithProduct>(&format!(
            "{RETURN_SELECT} ORDER BY r.created_at DESC, r.id OFFSET $2 LIMIT $3"
        ))
        .bind(UNKNOWN_PRODUCT)
        .bind(params.offset())
        .bind(params.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list returns: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    /// Get a return by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<ReturnResponseDto> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn, id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Return '{}' not found", id)))
    }

    /// Get the return filed against an order
    pub async fn get_by_order(&self, order_id: Uuid) -> Result<ReturnResponseDto> {
        sqlx::query_as::<_, ReturnWithProduct>(&format!("{RETURN_SELECT} WHERE r.order_id = $2"))
            .bind(UNKNOWN_PRODUCT)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get return by order: {:?}", e);
                AppError::Database(e)
            })?
            .map(Into::into)
            .ok_or_else(|| {
                AppError::NotFound(format!("No return for order '{}'", order_id))
            })
    }

    /// Register a return, restocking the order's units when the reason allows it
    pub async fn create(&self, dto: CreateReturnDto) -> Result<ReturnResponseDto> {
        let mut tx = self.pool.begin().await?;

        let order = holdings::lock_order(&mut tx, dto.order_id).await?;
        if order.return_reason.is_some() {
            return Err(AppError::Conflict(format!(
                "Order '{}' already has a return",
                dto.order_id
            )));
        }

        let after = units_held(order.status, order.quantity, Some(dto.reason));
        holdings::settle(&mut tx, order.product_id, order.held(), after).await?;

        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO returns (order_id, reason, description) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(dto.order_id)
        .bind(dto.reason)
        .bind(dto.description.trim())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to create return"))?;

        let created = fetch(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Return '{}' vanished after insert", id)))?;
        tx.commit().await?;

        tracing::info!(
            "Return created: id={}, order_id={}, reason={}, restocked={}",
            id,
            dto.order_id,
            dto.reason,
            order.held() - after
        );

        Ok(created.into())
    }

    /// Update reason or description, moving stock when restock eligibility changes
    pub async fn update(&self, id: Uuid, dto: UpdateReturnDto) -> Result<ReturnResponseDto> {
        let mut tx = self.pool.begin().await?;

        let order_id = order_of(&mut tx, id).await?;
        let order = holdings::lock_order(&mut tx, order_id).await?;
        if order.return_reason.is_none() {
            return Err(AppError::NotFound(format!("Return '{}' not found", id)));
        }

        if let Some(reason) = dto.reason {
            let after = units_held(order.status, order.quantity, Some(reason));
            holdings::settle(&mut tx, order.product_id, order.held(), after).await?;
        }

        sqlx::query(
            r#"
            UPDATE returns SET
                reason = COALESCE($2, reason),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(dto.reason)
        .bind(dto.description.as_deref().map(str::trim))
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to update return"))?;

        let updated = fetch(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Return '{}' not found", id)))?;
        tx.commit().await?;

        tracing::info!("Return updated: id={}, reason={}", id, updated.reason);

        Ok(updated.into())
    }

    /// Delete a return, taking back any units it restocked
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let order_id = order_of(&mut tx, id).await?;
        let order = holdings::lock_order(&mut tx, order_id).await?;

        let after = units_held(order.status, order.quantity, None);
        holdings::settle(&mut tx, order.product_id, order.held(), after).await?;

        let result = sqlx::query("DELETE FROM returns WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_db(e, "Failed to delete return"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Return '{}' not found", id)));
        }

        tx.commit().await?;

        tracing::info!("Return deleted: id={}, order_id={}", id, order_id);
        Ok(())
    }

    /// Every return with the date of its transaction, oldest first
    pub async fn list_with_dates(&self) -> Result<Vec<ReturnTimelineDto>> {
        let rows = sqlx::query_as::<_, ReturnTimelineEntry>(
            r#"
            SELECT r.id, r.order_id, r.reason, r.created_at, t.date AS transaction_date
            FROM returns r
            JOIN orders o ON o.id = r.order_id
            JOIN transactions t ON t.id = o.transaction_id
            ORDER BY t.date, r.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list return timeline: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

async fn fetch(conn: &mut PgConnection, id: Uuid) -> Result<Option<ReturnWithProduct>> {
    sqlx::query_as::<_, ReturnWithProduct>(&format!("{RETURN_SELECT} WHERE r.id = $2"))
        .bind(UNKNOWN_PRODUCT)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get return by ID: {:?}", e);
            AppError::Database(e)
        })
}

/// The order a return belongs to.
///
/// Read without a lock; the return row is only changed after its order is locked.
async fn order_of(conn: &mut PgConnection, id: Uuid) -> Result<Uuid> {
    sqlx::query_scalar("SELECT order_id FROM returns WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find return: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Return '{}' not found", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::orders::dtos::CreateOrderDto;
    use crate::features::orders::services::OrderService;
    use crate::features::returns::models::ReturnReason;
    use crate::features::transactions::models::TransactionStatus;
    use crate::shared::test_helpers::{
        insert_client, insert_product, insert_transaction, stock_of,
    };

    async fn order_in(pool: &PgPool, status: TransactionStatus, quantity: i32) -> (Uuid, Uuid) {
        let client = insert_client(pool, "Anna Nowak", "anna@example.com").await;
        let product = insert_product(pool, "Snow shovel", "30.00", 10).await;
        let transaction = insert_transaction(pool, client, status).await;
        let order = OrderService::new(pool.clone())
            .create(CreateOrderDto {
                transaction_id: transaction,
                product_id: product,
                quantity,
            })
            .await
            .unwrap();
        (order.id, product)
    }

    fn return_for(order_id: Uuid, reason: ReturnReason) -> CreateReturnDto {
        CreateReturnDto {
            order_id,
            reason,
            description: "Strap torn on first use".to_string(),
        }
    }

    #[sqlx::test]
    async fn test_return_lifecycle_moves_stock_by_reason(pool: PgPool) {
        let (order_id, product) = order_in(&pool, TransactionStatus::Completed, 2).await;
        let service = ReturnService::new(pool.clone());
        assert_eq!(stock_of(&pool, product).await, 8);

        let created = service
            .create(return_for(order_id, ReturnReason::FaultyProduct))
            .await
            .unwrap();
        assert_eq!(stock_of(&pool, product).await, 10);

        let with_reason = |reason| UpdateReturnDto {
            reason: Some(reason),
            ..Default::default()
        };
        service
            .update(created.id, with_reason(ReturnReason::ProductNotReceived))
            .await
            .unwrap();
        assert_eq!(stock_of(&pool, product).await, 8);

        service.update(created.id, with_reason(ReturnReason::Other)).await.unwrap();
        assert_eq!(stock_of(&pool, product).await, 10);

        service.delete(created.id).await.unwrap();
        assert_eq!(stock_of(&pool, product).await, 8);
    }

    #[sqlx::test]
    async fn test_returns_under_cancelled_transaction_never_restock(pool: PgPool) {
        let (order_id, product) = order_in(&pool, TransactionStatus::Cancelled, 2).await;
        let service = ReturnService::new(pool.clone());
        assert_eq!(stock_of(&pool, product).await, 10);

        let created = service
            .create(return_for(order_id, ReturnReason::FaultyProduct))
            .await
            .unwrap();
        assert_eq!(stock_of(&pool, product).await, 10);

        for reason in [ReturnReason::ProductNotReceived, ReturnReason::Other] {
            service
                .update(
                    created.id,
                    UpdateReturnDto {
                        reason: Some(reason),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            assert_eq!(stock_of(&pool, product).await, 10);
        }

        service.delete(created.id).await.unwrap();
        assert_eq!(stock_of(&pool, product).await, 10);
    }

    #[sqlx::test]
    async fn test_second_return_for_order_conflicts(pool: PgPool) {
        let (order_id, product) = order_in(&pool, TransactionStatus::Completed, 1).await;
        let service = ReturnService::new(pool.clone());

        service
            .create(return_for(order_id, ReturnReason::Other))
            .await
            .unwrap();
        let err = service
            .create(return_for(order_id, ReturnReason::FaultyProduct))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(stock_of(&pool, product).await, 10);
    }

    #[sqlx::test]
    async fn test_missing_return_is_not_found(pool: PgPool) {
        let service = ReturnService::new(pool.clone());
        let err = service.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
