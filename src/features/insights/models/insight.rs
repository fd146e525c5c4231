use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a stored insight
#[derive(Debug, Clone, FromRow)]
pub struct Insight {
    pub id: Uuid,
    pub executive_summary: String,
    pub key_findings: Value,
    pub recommendations: Vec<String>,
    pub operational_actions: Option<Vec<String>>,
    pub raw_metrics: Value,
    pub created_at: DateTime<Utc>,
}
