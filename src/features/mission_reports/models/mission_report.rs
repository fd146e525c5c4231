use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Mission report row with its reporter's name and the incident type
#[derive(Debug, Clone, FromRow)]
pub struct MissionReportWithContext {
    pub id: Uuid,
    pub incident_id: Uuid,
    pub incident_type: String,
    pub reporter_id: Uuid,
    pub reporter_name: String,
    pub difficulty_rating: Option<i16>,
    pub notes: String,
    pub report_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
