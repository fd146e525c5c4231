use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::mission_reports::dtos::{
    CreateMissionReportDto, MissionReportQueryParams, MissionReportResponseDto,
    UpdateMissionReportDto,
};
use crate::features::mission_reports::models::MissionReportWithContext;
use crate::shared::constants::UNKNOWN;
use crate::shared::types::{Page, Paginated};

// Expects the report aliased `r`, incident `i` and personnel `p`; `$1` is the fallback
const REPORT_COLUMNS: &str = r#"
    r.id, r.incident_id, COALESCE(i.incident_type::text, $1) AS incident_type,
    r.reporter_id, COALESCE(p.name, $1) AS reporter_name,
    r.difficulty_rating, r.notes, r.report_date, r.created_at, r.updated_at
"#;

const REPORT_JOINS: &str = r#"
    LEFT JOIN incidents i ON i.id = r.incident_id
    LEFT JOIN personnel p ON p.id = r.reporter_id
"#;

/// Service for post-mission reports
pub struct MissionReportService {
    pool: PgPool,
}

impl MissionReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List mission reports, newest first
    pub async fn list(
        &self,
        params: &MissionReportQueryParams,
    ) -> Result<Page<MissionReportResponseDto>> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM mission_reports
            WHERE ($1::uuid IS NULL OR incident_id = $1)
              AND ($2::uuid IS NULL OR reporter_id = $2)
            "#,
        )
        .bind(params.incident_id)
        .bind(params.reporter_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count mission reports: {:?}", e);
            AppError::Database(e)
        })?;

        let rows = sqlx::query_as::<_, MissionReportWithContext>(&format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM mission_reports r
            {REPORT_JOINS}
            WHERE ($2::uuid IS NULL OR r.incident_id = $2)
              AND ($3::uuid IS NULL OR r.reporter_id = $3)
            ORDER BY r.report_date DESC, r.id
            OFFSET $4 LIMIT $5
            "#
        ))
        .bind(UNKNOWN)
        .bind(params.incident_id)
        .bind(params.reporter_id)
        .bind(params.offset())
        .bind(params.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list mission reports: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    /// Get a mission report by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<MissionReportResponseDto> {
        sqlx::query_as::<_, MissionReportWithContext>(&format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM mission_reports r
            {REPORT_JOINS}
            WHERE r.id = $2
            "#
        ))
        .bind(UNKNOWN)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get mission report by ID: {:?}", e);
            AppError::Database(e)
        })?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("Mission report '{}' not found", id)))
    }

    /// File a mission report for an existing incident and reporter
    pub async fn create(&self, dto: CreateMissionReportDto) -> Result<MissionReportResponseDto> {
        let report = sqlx::query_as::<_, MissionReportWithContext>(&format!(
            r#"
            WITH r AS (
                INSERT INTO mission_reports (
                    incident_id, reporter_id, difficulty_rating, notes, report_date
                ) VALUES ($2, $3, $4, $5, $6)
                RETURNING *
            )
            SELECT {REPORT_COLUMNS}
            FROM r
            {REPORT_JOINS}
            "#
        ))
        .bind(UNKNOWN)
        .bind(dto.incident_id)
        .bind(dto.reporter_id)
        .bind(dto.difficulty_rating)
        .bind(&dto.notes)
        .bind(dto.report_date.unwrap_or_else(Utc::now))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to create mission report"))?;

        tracing::info!(
            "Mission report created: id={}, incident_id={}, reporter_id={}",
            report.id,
            report.incident_id,
            report.reporter_id
        );

        Ok(report.into())
    }

    /// Update difficulty or notes
    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateMissionReportDto,
    ) -> Result<MissionReportResponseDto> {
        let report = sqlx::query_as::<_, MissionReportWithContext>(&format!(
            r#"
            WITH r AS (
                UPDATE mission_reports SET
                    difficulty_rating = COALESCE($3, difficulty_rating),
                    notes = COALESCE($4, notes),
                    updated_at = NOW()
                WHERE id = $2
                RETURNING *
            )
            SELECT {REPORT_COLUMNS}
            FROM r
            {REPORT_JOINS}
            "#
        ))
        .bind(UNKNOWN)
        .bind(id)
        .bind(dto.difficulty_rating)
        .bind(dto.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to update mission report"))?
        .ok_or_else(|| AppError::NotFound(format!("Mission report '{}' not found", id)))?;

        tracing::info!("Mission report updated: id={}", report.id);

        Ok(report.into())
    }

    /// Delete a mission report
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM mission_reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_db(e, "Failed to delete mission report"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Mission report '{}' not found",
                id
            )));
        }

        tracing::info!("Mission report deleted: id={}", id);
        Ok(())
    }
}
