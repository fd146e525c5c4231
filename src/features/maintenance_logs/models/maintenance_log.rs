use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Maintenance log row joined with the name of its equipment
#[derive(Debug, Clone, FromRow)]
pub struct MaintenanceLogWithEquipment {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub equipment_name: String,
    pub issue_type: String,
    pub description: String,
    pub log_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
