use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a dispatch linking an incident to personnel and/or equipment
#[derive(Debug, Clone, FromRow)]
pub struct Dispatch {
    pub id: Uuid,
    pub incident_id: Uuid,
    pub personnel_id: Option<Uuid>,
    pub equipment_id: Option<Uuid>,
    pub dispatch_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
