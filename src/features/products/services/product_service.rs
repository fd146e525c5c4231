use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::orders::services::holdings;
use crate::features::products::dtos::{
    CreateProductDto, ProductQueryParams, ProductResponseDto, UpdateProductDto,
};
use crate::features::products::models::Product;
use crate::features::products::services::stock;
use crate::features::transactions::services::totals;
use crate::shared::types::{Page, Paginated};

const PRODUCT_COLUMNS: &str = "id, name, price, stock, image, created_at, updated_at";

/// Service for the product catalogue
pub struct ProductService {
    pool: PgPool,
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List products ordered by name
    pub async fn list(&self, params: &ProductQueryParams) -> Result<Page<ProductResponseDto>> {
        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        // Substring match; `%` and `_` in the search are literal
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM products
            WHERE ($1::text IS NULL OR strpos(lower(name), lower($1)) > 0)
            "#,
        )
        .bind(search)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count products: {:?}", e);
            AppError::Database(e)
        })?;

        let rows = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1::text IS NULL OR strpos(lower(name), lower($1)) > 0)
            ORDER BY name, id
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(search)
        .bind(params.offset())
        .bind(params.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list products: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    /// Get a product by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<ProductResponseDto> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get product by ID: {:?}", e);
            AppError::Database(e)
        })?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", id)))
    }

    /// Add a product
    pub async fn create(&self, dto: CreateProductDto) -> Result<ProductResponseDto> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, price, stock, image)
            VALUES ($1, $2, $3, $4)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(dto.name.trim())
        .bind(dto.price.round_dp(2))
        .bind(dto.stock)
        .bind(dto.image.trim())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to create product"))?;

        tracing::info!(
            "Product created: id={}, price={}, stock={}",
            product.id,
            product.price,
            product.stock
        );

        Ok(product.into())
    }

    /// Partially update a product.
    ///
    /// A price change recalculates every transaction that contains the product.
    pub async fn update(&self, id: Uuid, dto: UpdateProductDto) -> Result<ProductResponseDto> {
        let mut tx = self.pool.begin().await?;

        // Totals depending on the price are locked ahead of the product row
        if dto.price.is_some() {
            holdings::lock_transactions_for_product(&mut tx, id).await?;
        }

        let previous = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to lock product: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", id)))?;

        let price = dto.price.map(|p| p.round_dp(2));

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                price = COALESCE($3, price),
                image = COALESCE($4, image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(price)
        .bind(dto.image.as_deref().map(str::trim))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to update product"))?;

        if product.price != previous.price {
            let recalculated = totals::recalculate_for_product(&mut tx, id).await?;
            tracing::info!(
                "Product price changed: id={}, {} -> {}, transactions recalculated={}",
                id,
                previous.price,
                product.price,
                recalculated
            );
        }

        tx.commit().await?;

        tracing::info!("Product updated: id={}", product.id);

        Ok(product.into())
    }

    /// Apply a relative stock change
    pub async fn update_stock(&self, id: Uuid, amount_change: i32) -> Result<ProductResponseDto> {
        let mut tx = self.pool.begin().await?;

        stock::adjust_stock(&mut tx, id, amount_change).await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to reload product: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await?;

        Ok(product.into())
    }

    /// Delete a product that no order references
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match AppError::from_db(e, "Failed to delete product") {
                AppError::BadRequest(_) => AppError::Conflict(format!(
                    "Product '{}' is referenced by orders and cannot be deleted",
                    id
                )),
                other => other,
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Product '{}' not found", id)));
        }

        tracing::info!("Product deleted: id={}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::orders::dtos::CreateOrderDto;
    use crate::features::orders::services::OrderService;
    use crate::features::transactions::models::TransactionStatus;
    use crate::shared::test_helpers::{
        dec, insert_client, insert_product, insert_transaction, total_of,
    };

    #[sqlx::test]
    async fn test_price_change_recalculates_containing_transactions(pool: PgPool) {
        let client = insert_client(&pool, "Anna Nowak", "anna@example.com").await;
        let product = insert_product(&pool, "Harness", "10.00", 20).await;
        let other = insert_product(&pool, "Carabiner", "2.00", 20).await;
        let first = insert_transaction(&pool, client, TransactionStatus::Pending).await;
        let second = insert_transaction(&pool, client, TransactionStatus::Completed).await;
        let untouched = insert_transaction(&pool, client, TransactionStatus::Pending).await;

        let orders = OrderService::new(pool.clone());
        for (transaction_id, product_id, quantity) in [
            (first, product, 3),
            (second, product, 1),
            (second, other, 2),
            (untouched, other, 5),
        ] {
            orders
                .create(CreateOrderDto {
                    transaction_id,
                    product_id,
                    quantity,
                })
                .await
                .unwrap();
        }

        let updated = ProductService::new(pool.clone())
            .update(
                product,
                UpdateProductDto {
                    price: Some(dec("12.5")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price, dec("12.50"));
        assert_eq!(total_of(&pool, first).await, dec("37.50"));
        assert_eq!(total_of(&pool, second).await, dec("16.50"));
        assert_eq!(total_of(&pool, untouched).await, dec("10.00"));
    }

    #[sqlx::test]
    async fn test_ordered_product_cannot_be_deleted(pool: PgPool) {
        let client = insert_client(&pool, "Anna Nowak", "anna@example.com").await;
        let product = insert_product(&pool, "Harness", "10.00", 20).await;
        let transaction = insert_transaction(&pool, client, TransactionStatus::Pending).await;
        OrderService::new(pool.clone())
            .create(CreateOrderDto {
                transaction_id: transaction,
                product_id: product,
                quantity: 1,
            })
            .await
            .unwrap();

        let service = ProductService::new(pool.clone());
        let err = service.delete(product).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(service.get_by_id(product).await.is_ok());
    }

    #[sqlx::test]
    async fn test_search_treats_wildcards_literally(pool: PgPool) {
        insert_product(&pool, "Ice axe", "80.00", 3).await;
        insert_product(&pool, "Rope_60m", "120.00", 2).await;
        insert_product(&pool, "Gloves 100%", "25.00", 9).await;
        let service = ProductService::new(pool.clone());

        let search = |term: &str| ProductQueryParams {
            page: 1,
            page_size: 10,
            search: Some(term.to_string()),
        };

        let page = service.list(&search("_")).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Rope_60m");

        let page = service.list(&search("%")).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Gloves 100%");

        let page = service.list(&search("ICE")).await.unwrap();
        assert_eq!(page.total, 1);
    }
}
