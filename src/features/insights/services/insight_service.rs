use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::insights::dtos::{CreateInsightDto, InsightResponseDto};
use crate::features::insights::models::Insight;

const INSIGHT_COLUMNS: &str = r#"
    id, executive_summary, key_findings, recommendations, operational_actions,
    raw_metrics, created_at
"#;

/// Service for report-service insights
pub struct InsightService {
    pool: PgPool,
}

impl InsightService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Most recently stored insight
    pub async fn get_latest(&self) -> Result<InsightResponseDto> {
        let insight = sqlx::query_as::<_, Insight>(&format!(
            "SELECT {INSIGHT_COLUMNS} FROM insights ORDER BY created_at DESC, id DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get latest insight: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("No insights available".to_string()))?;

        Ok(insight.into())
    }

    pub async fn save(&self, dto: CreateInsightDto) -> Result<InsightResponseDto> {
        let insight = sqlx::query_as::<_, Insight>(&format!(
            r#"
            INSERT INTO insights (
                executive_summary, key_findings, recommendations,
                operational_actions, raw_metrics
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {INSIGHT_COLUMNS}
            "#
        ))
        .bind(dto.executive_summary.trim())
        .bind(&dto.key_findings)
        .bind(&dto.recommendations)
        .bind(&dto.operational_actions)
        .bind(&dto.raw_metrics)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to save insight"))?;

        tracing::info!("Insight stored: {}", insight.id);
        Ok(insight.into())
    }
}
