use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::maintenance_logs::dtos::{
    CreateMaintenanceLogDto, MaintenanceLogQueryParams, MaintenanceLogResponseDto,
    UpdateMaintenanceLogDto,
};
use crate::features::maintenance_logs::models::MaintenanceLogWithEquipment;
use crate::shared::constants::UNKNOWN_EQUIPMENT;
use crate::shared::types::{Page, Paginated};

// Expects the log row aliased `m` and equipment `e`; `$1` is the fallback name
const LOG_COLUMNS: &str = r#"
    m.id, m.equipment_id, COALESCE(e.name, $1) AS equipment_name,
    m.issue_type, m.description, m.log_date, m.created_at, m.updated_at
"#;

/// Service for equipment maintenance logs
pub struct MaintenanceLogService {
    pool: PgPool,
}

impl MaintenanceLogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List maintenance logs, newest first
    pub async fn list(
        &self,
        params: &MaintenanceLogQueryParams,
    ) -> Result<Page<MaintenanceLogResponseDto>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM maintenance_logs WHERE ($1::uuid IS NULL OR equipment_id = $1)",
        )
        .bind(params.equipment_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count maintenance logs: {:?}", e);
            AppError::Database(e)
        })?;

        let rows = sqlx::query_as::<_, MaintenanceLogWithEquipment>(&format!(
            r#"
            SELECT {LOG_COLUMNS}
            FROM maintenance_logs m
            LEFT JOIN equipment e ON e.id = m.equipment_id
            WHERE ($2::uuid IS NULL OR m.equipment_id = $2)
            ORDER BY m.log_date DESC, m.created_at DESC
            OFFSET $3 LIMIT $4
            "#
        ))
        .bind(UNKNOWN_EQUIPMENT)
        .bind(params.equipment_id)
        .bind(params.offset())
        .bind(params.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list maintenance logs: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    /// Get a maintenance log by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<MaintenanceLogResponseDto> {
        sqlx::query_as::<_, MaintenanceLogWithEquipment>(&format!(
            r#"
            SELECT {LOG_COLUMNS}
            FROM maintenance_logs m
            LEFT JOIN equipment e ON e.id = m.equipment_id
            WHERE m.id = $2
            "#
        ))
        .bind(UNKNOWN_EQUIPMENT)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get maintenance log by ID: {:?}", e);
            AppError::Database(e)
        })?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("Maintenance log '{}' not found", id)))
    }

    /// Log maintenance for existing equipment
    pub async fn create(&self, dto: CreateMaintenanceLogDto) -> Result<MaintenanceLogResponseDto> {
        let log = sqlx::query_as::<_, MaintenanceLogWithEquipment>(&format!(
            r#"
            WITH m AS (
                INSERT INTO maintenance_logs (equipment_id, issue_type, description, log_date)
                VALUES ($2, $3, $4, $5)
                RETURNING *
            )
            SELECT {LOG_COLUMNS}
            FROM m
            LEFT JOIN equipment e ON e.id = m.equipment_id
            "#
        ))
        .bind(UNKNOWN_EQUIPMENT)
        .bind(dto.equipment_id)
        .bind(dto.issue_type.trim())
        .bind(&dto.description)
        .bind(dto.log_date.unwrap_or_else(|| Utc::now().date_naive()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to create maintenance log"))?;

        tracing::info!(
            "Maintenance log created: id={}, equipment_id={}, issue_type={}",
            log.id,
            log.equipment_id,
            log.issue_type
        );

        Ok(log.into())
    }

    /// Partially update a maintenance log
    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateMaintenanceLogDto,
    ) -> Result<MaintenanceLogResponseDto> {
        let log = sqlx::query_as::<_, MaintenanceLogWithEquipment>(&format!(
            r#"
            WITH m AS (
                UPDATE maintenance_logs SET
                    issue_type = COALESCE($3, issue_type),
                    description = COALESCE($4, description),
                    log_date = COALESCE($5, log_date),
                    updated_at = NOW()
                WHERE id = $2
                RETURNING *
            )
            SELECT {LOG_COLUMNS}
            FROM m
            LEFT JOIN equipment e ON e.id = m.equipment_id
            "#
        ))
        .bind(UNKNOWN_EQUIPMENT)
        .bind(id)
        .bind(dto.issue_type.as_deref().map(str::trim))
        .bind(dto.description)
        .bind(dto.log_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to update maintenance log"))?
        .ok_or_else(|| AppError::NotFound(format!("Maintenance log '{}' not found", id)))?;

        tracing::info!("Maintenance log updated: id={}", log.id);

        Ok(log.into())
    }

    /// Delete a maintenance log
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM maintenance_logs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_db(e, "Failed to delete maintenance log"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Maintenance log '{}' not found",
                id
            )));
        }

        tracing::info!("Maintenance log deleted: id={}", id);
        Ok(())
    }
}
