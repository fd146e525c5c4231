use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::clients::dtos::{
    ClientQueryParams, ClientResponseDto, ClientStatsDto, CreateClientDto, UpdateClientDto,
};
use crate::features::clients::models::{Client, MonthlySpending};
use crate::shared::types::{Page, Paginated};

const CLIENT_COLUMNS: &str = r#"
    id, name, email, phone, birth_date, sex,
    address_line1, address_line2, post_code, city, country,
    created_at, updated_at
"#;

/// Mean value per transaction, rounded to cents; zero when there are none
fn average_value(total: Decimal, count: i64) -> Decimal {
    if count <= 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(count)).round_dp(2)
}

/// Service for retail clients
pub struct ClientService {
    pool: PgPool,
}

impl ClientService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List clients ordered by name
    pub async fn list(&self, params: &ClientQueryParams) -> Result<Page<ClientResponseDto>> {
        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM clients
            WHERE ($1::text IS NULL
                   OR strpos(lower(name), lower($1)) > 0
                   OR strpos(lower(email), lower($1)) > 0)
            "#,
        )
        .bind(search)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count clients: {:?}", e);
            AppError::Database(e)
        })?;

        let rows = sqlx::query_as::<_, Client>(&format!(
            r#"
            SELECT {CLIENT_COLUMNS}
            FROM clients
            WHERE ($1::text IS NULL
                   OR strpos(lower(name), lower($1)) > 0
                   OR strpos(lower(email), lower($1)) > 0)
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
            tracing::error!("Failed to list clients: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    /// Get a client by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<ClientResponseDto> {
        sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get client by ID: {:?}", e);
            AppError::Database(e)
        })?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("Client '{}' not found", id)))
    }

    /// Get a client by email
    pub async fn get_by_email(&self, email: &str) -> Result<ClientResponseDto> {
        sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get client by email: {:?}", e);
            AppError::Database(e)
        })?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("Client with email '{}' not found", email)))
    }

    /// Get a client by exact name. Names are not unique; the oldest match wins.
    pub async fn get_by_name(&self, name: &str) -> Result<ClientResponseDto> {
        sqlx::query_as::<_, Client>(&format!(
            r#"
            SELECT {CLIENT_COLUMNS} FROM clients
            WHERE name = $1
            ORDER BY created_at, id
            LIMIT 1
            "#
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get client by name: {:?}", e);
            AppError::Database(e)
        })?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("Client named '{}' not found", name)))
    }

    /// Register a client
    pub async fn create(&self, dto: CreateClientDto) -> Result<ClientResponseDto> {
        let client = sqlx::query_as::<_, Client>(&format!(
            r#"
            INSERT INTO clients (
                name, email, phone, birth_date, sex,
                address_line1, address_line2, post_code, city, country
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {CLIENT_COLUMNS}
            "#
        ))
        .bind(dto.name.trim())
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(dto.birth_date)
        .bind(dto.sex.trim())
        .bind(dto.address.line1.trim())
        .bind(dto.address.line2.trim())
        .bind(&dto.address.post_code)
        .bind(dto.address.city.trim())
        .bind(dto.address.country.trim())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to create client"))?;

        tracing::info!("Client created: id={}, city={}", client.id, client.city);

        Ok(client.into())
    }

    /// Partially update a client
    pub async fn update(&self, id: Uuid, dto: UpdateClientDto) -> Result<ClientResponseDto> {
        let address = dto.address.as_ref();

        let client = sqlx::query_as::<_, Client>(&format!(
            r#"
            UPDATE clients SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                birth_date = COALESCE($5, birth_date),
                sex = COALESCE($6, sex),
                address_line1 = COALESCE($7, address_line1),
                address_line2 = COALESCE($8, address_line2),
                post_code = COALESCE($9, post_code),
                city = COALESCE($10, city),
                country = COALESCE($11, country),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CLIENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.email.as_deref())
        .bind(dto.phone.as_deref())
        .bind(dto.birth_date)
        .bind(dto.sex.as_deref().map(str::trim))
        .bind(address.map(|a| a.line1.trim()))
        .bind(address.map(|a| a.line2.trim()))
        .bind(address.map(|a| a.post_code.as_str()))
        .bind(address.map(|a| a.city.trim()))
        .bind(address.map(|a| a.country.trim()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to update client"))?
        .ok_or_else(|| AppError::NotFound(format!("Client '{}' not found", id)))?;

        tracing::info!("Client updated: id={}", client.id);

        Ok(client.into())
    }

    /// Delete a client that owns no transactions
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match AppError::from_db(e, "Failed to delete client") {
                AppError::BadRequest(_) => AppError::Conflict(format!(
                    "Client '{}' still has transactions and cannot be deleted",
                    id
                )),
                other => other,
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Client '{}' not found", id)));
        }

        tracing::info!("Client deleted: id={}", id);
        Ok(())
    }

    /// Purchase statistics for one client
    pub async fn detail_stats(&self, id: Uuid) -> Result<ClientStatsDto> {
        self.get_by_id(id).await?;

        let (transaction_count, completed_count, total_spent): (i64, i64, Decimal) =
            sqlx::query_as(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE status <> 'cancelled'),
                    COALESCE(SUM(total_price) FILTER (WHERE status <> 'cancelled'), 0)
                FROM transactions
                WHERE client_id = $1
                "#,
            )
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to aggregate client transactions: {:?}", e);
                AppError::Database(e)
            })?;

        let monthly = sqlx::query_as::<_, MonthlySpending>(
            r#"
            SELECT
                to_char(date_trunc('month', date), 'YYYY-MM') AS month,
                SUM(total_price) AS total
            FROM transactions
            WHERE client_id = $1 AND status <> 'cancelled'
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to aggregate client monthly spending: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(ClientStatsDto {
            transaction_count,
            total_spent,
            average_transaction_value: average_value(total_spent, completed_count),
            monthly_spending: monthly.into_iter().map(Into::into).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::transactions::models::TransactionStatus;
    use crate::shared::test_helpers::{insert_client, insert_transaction};

    #[test]
    fn test_average_value_rounds_to_cents() {
        let total: Decimal = "100.00".parse().unwrap();
        assert_eq!(average_value(total, 3), "33.33".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_average_value_without_transactions_is_zero() {
        assert_eq!(average_value(Decimal::ZERO, 0), Decimal::ZERO);
    }

    fn search(term: Option<&str>, page: i64) -> ClientQueryParams {
        ClientQueryParams {
            page,
            page_size: 100,
            search: term.map(str::to_string),
        }
    }

    #[sqlx::test]
    async fn test_client_with_transactions_cannot_be_deleted(pool: PgPool) {
        let client = insert_client(&pool, "Anna Nowak", "anna@example.com").await;
        insert_transaction(&pool, client, TransactionStatus::Completed).await;
        let service = ClientService::new(pool.clone());

        let err = service.delete(client).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(service.get_by_id(client).await.is_ok());

        let idle = insert_client(&pool, "Jan Kowalski", "jan@example.com").await;
        service.delete(idle).await.unwrap();
        assert!(matches!(
            service.get_by_id(idle).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[sqlx::test]
    async fn test_search_matches_underscore_and_percent_literally(pool: PgPool) {
        insert_client(&pool, "Anna Nowak", "anna@example.com").await;
        insert_client(&pool, "Jan Kowalski", "jan_k@example.com").await;
        let service = ClientService::new(pool.clone());

        let page = service.list(&search(Some("_"), 1)).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].email, "jan_k@example.com");

        let page = service.list(&search(Some("%"), 1)).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());

        let page = service.list(&search(Some("NOWAK"), 1)).await.unwrap();
        assert_eq!(page.total, 1);
    }

    #[sqlx::test]
    async fn test_page_far_past_the_end_is_empty(pool: PgPool) {
        insert_client(&pool, "Anna Nowak", "anna@example.com").await;
        let service = ClientService::new(pool.clone());

        let page = service.list(&search(None, i64::MAX)).await.unwrap();
        assert_eq!(page.total, 1);
        assert!(page.items.is_empty());
    }
}
