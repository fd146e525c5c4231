use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Equipment status matching the `equipment_status` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "equipment_status")]
pub enum EquipmentStatus {
    Available,
    #[sqlx(rename = "In Use")]
    #[serde(rename = "In Use")]
    InUse,
    Maintenance,
    Retired,
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EquipmentStatus::Available => write!(f, "Available"),
            EquipmentStatus::InUse => write!(f, "In Use"),
            EquipmentStatus::Maintenance => write!(f, "Maintenance"),
            EquipmentStatus::Retired => write!(f, "Retired"),
        }
    }
}

/// Database model for equipment
#[derive(Debug, Clone, FromRow)]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub status: EquipmentStatus,
    pub image: Option<String>,
    pub last_inspected: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
