use chrono::Utc;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::dashboard::dtos::{DashboardSummaryDto, OperationsExportDto};
use crate::features::dispatches::models::Dispatch;
use crate::features::equipment::models::{Equipment, EquipmentStatus};
use crate::features::incidents::models::Incident;
use crate::features::maintenance_logs::models::MaintenanceLogWithEquipment;
use crate::features::personnel::models::Personnel;
use crate::shared::constants::UNKNOWN_EQUIPMENT;

/// Service for operations dashboard queries
pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Summary
    // ========================================================================

    /// Headline counters in a single round trip
    pub async fn get_summary(&self) -> Result<DashboardSummaryDto> {
        sqlx::query_as::<_, DashboardSummaryDto>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM incidents WHERE status = 'active') AS active_incidents,
                (SELECT COUNT(*) FROM incidents) AS total_incidents,
                (SELECT COUNT(*) FROM personnel WHERE is_available) AS available_personnel,
                (SELECT COUNT(*) FROM personnel) AS total_personnel,
                (SELECT COUNT(*) FROM equipment WHERE status = $1) AS available_equipment,
                (SELECT COUNT(*) FROM equipment) AS total_equipment,
                (SELECT COUNT(*) FROM maintenance_logs) AS maintenance_logs
            "#,
        )
        .bind(EquipmentStatus::Available)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get dashboard summary: {:?}", e);
            AppError::Database(e)
        })
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Snapshot of all operational records
    pub async fn export(&self) -> Result<OperationsExportDto> {
        let incidents = sqlx::query_as::<_, Incident>(
            r#"
            SELECT id, incident_type, status, severity_level, latitude, longitude,
                   weather_conditions, reported_date, created_at, updated_at
            FROM incidents
            ORDER BY reported_date DESC, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to export incidents: {:?}", e);
            AppError::Database(e)
        })?;

        let personnel = sqlx::query_as::<_, Personnel>(
            r#"
            SELECT id, name, email, phone, role, certifications, base_station,
                   is_available, ai_profile_summary, created_at, updated_at
            FROM personnel
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to export personnel: {:?}", e);
            AppError::Database(e)
        })?;

        let equipment = sqlx::query_as::<_, Equipment>(
            r#"
            SELECT id, name, category, status, image, last_inspected, created_at, updated_at
            FROM equipment
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to export equipment: {:?}", e);
            AppError::Database(e)
        })?;

        let maintenance_logs = sqlx::query_as::<_, MaintenanceLogWithEquipment>(
            r#"
            SELECT m.id, m.equipment_id, COALESCE(e.name, $1) AS equipment_name,
                   m.issue_type, m.description, m.log_date, m.created_at, m.updated_at
            FROM maintenance_logs m
            LEFT JOIN equipment e ON e.id = m.equipment_id
            ORDER BY m.log_date DESC, m.id
            "#,
        )
        .bind(UNKNOWN_EQUIPMENT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to export maintenance logs: {:?}", e);
            AppError::Database(e)
        })?;

        let dispatches = sqlx::query_as::<_, Dispatch>(
            r#"
            SELECT id, incident_id, personnel_id, equipment_id, dispatch_time,
                   created_at, updated_at
            FROM dispatches
            ORDER BY dispatch_time DESC, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to export dispatches: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Operations exported: incidents={}, personnel={}, equipment={}, logs={}, dispatches={}",
            incidents.len(),
            personnel.len(),
            equipment.len(),
            maintenance_logs.len(),
            dispatches.len()
        );

        Ok(OperationsExportDto {
            generated_at: Utc::now(),
            incidents: incidents.into_iter().map(Into::into).collect(),
            personnel: personnel.into_iter().map(Into::into).collect(),
            equipment: equipment.into_iter().map(Into::into).collect(),
            maintenance_logs: maintenance_logs.into_iter().map(Into::into).collect(),
            dispatches: dispatches.into_iter().map(Into::into).collect(),
        })
    }
}
