use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a rescue team member
#[derive(Debug, Clone, FromRow)]
pub struct Personnel {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub certifications: Vec<String>,
    pub base_station: String,
    pub is_available: bool,
    pub ai_profile_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mission counters aggregated over a person's dispatches
#[derive(Debug, Clone, Default, FromRow)]
pub struct PersonnelStats {
    pub total_missions: i64,
    pub active_missions: i64,
    pub resolved_missions: i64,
}
