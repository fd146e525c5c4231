use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::equipment::dtos::{
    CreateEquipmentDto, EquipmentQueryParams, EquipmentResponseDto, UpdateEquipmentDto,
};
use crate::features::equipment::models::{Equipment, EquipmentStatus};
use crate::shared::types::{Page, Paginated};

const EQUIPMENT_COLUMNS: &str = r#"
    id, name, category, status, image, last_inspected, created_at, updated_at
"#;

/// Service for equipment inventory
pub struct EquipmentService {
    pool: PgPool,
}

impl EquipmentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List equipment ordered by name
    pub async fn list(&self, params: &EquipmentQueryParams) -> Result<Page<EquipmentResponseDto>> {
        let category = params
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM equipment
            WHERE ($1::equipment_status IS NULL OR status = $1)
              AND ($2::text IS NULL OR LOWER(category) = LOWER($2))
            "#,
        )
        .bind(params.status)
        .bind(category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count equipment: {:?}", e);
            AppError::Database(e)
        })?;

        let rows = sqlx::query_as::<_, Equipment>(&format!(
            r#"
            SELECT {EQUIPMENT_COLUMNS}
            FROM equipment
            WHERE ($1::equipment_status IS NULL OR status = $1)
              AND ($2::text IS NULL OR LOWER(category) = LOWER($2))
            ORDER BY name, id
            OFFSET $3 LIMIT $4
            "#
        ))
        .bind(params.status)
        .bind(category)
        .bind(params.offset())
        .bind(params.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list equipment: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<EquipmentResponseDto> {
        sqlx::query_as::<_, Equipment>(&format!(
            "SELECT {EQUIPMENT_COLUMNS} FROM equipment WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get equipment by ID: {:?}", e);
            AppError::Database(e)
        })?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("Equipment '{}' not found", id)))
    }

    /// Register equipment
    pub async fn create(&self, dto: CreateEquipmentDto) -> Result<EquipmentResponseDto> {
        let equipment = sqlx::query_as::<_, Equipment>(&format!(
            r#"
            INSERT INTO equipment (name, category, status, image, last_inspected)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {EQUIPMENT_COLUMNS}
            "#
        ))
        .bind(dto.name.trim())
        .bind(dto.category.trim())
        .bind(dto.status.unwrap_or(EquipmentStatus::Available))
        .bind(dto.image)
        .bind(dto.last_inspected)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to create equipment"))?;

        tracing::info!(
            "Equipment created: id={}, category={}, status={}",
            equipment.id,
            equipment.category,
            equipment.status
        );

        Ok(equipment.into())
    }

    /// Partially update equipment
    pub async fn update(&self, id: Uuid, dto: UpdateEquipmentDto) -> Result<EquipmentResponseDto> {
        let equipment = sqlx::query_as::<_, Equipment>(&format!(
            r#"
            UPDATE equipment SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                status = COALESCE($4, status),
                image = COALESCE($5, image),
                last_inspected = COALESCE($6, last_inspected),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EQUIPMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.category.as_deref().map(str::trim))
        .bind(dto.status)
        .bind(dto.image)
        .bind(dto.last_inspected)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to update equipment"))?
        .ok_or_else(|| AppError::NotFound(format!("Equipment '{}' not found", id)))?;

        tracing::info!(
            "Equipment updated: id={}, status={}",
            equipment.id,
            equipment.status
        );

        Ok(equipment.into())
    }

    /// Delete equipment. Dispatch links are cleared and maintenance logs removed.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // Referencing dispatches are cleared, so their incidents lock first
        sqlx::query(
            r#"
            SELECT i.id FROM incidents i
            WHERE i.id IN (SELECT incident_id FROM dispatches WHERE equipment_id = $1)
            ORDER BY i.id
            FOR UPDATE
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to lock incidents for equipment: {:?}", e);
            AppError::Database(e)
        })?;

        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_db(e, "Failed to delete equipment"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment '{}' not found", id)));
        }

        tx.commit().await?;

        tracing::info!("Equipment deleted: id={}", id);
        Ok(())
    }
}
