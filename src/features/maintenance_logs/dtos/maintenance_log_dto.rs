use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::maintenance_logs::models::MaintenanceLogWithEquipment;
use crate::shared::types::{default_page, default_page_size, impl_paginated};
use crate::shared::validation::validate_not_blank;

/// Request DTO for logging maintenance on equipment
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMaintenanceLogDto {
    pub equipment_id: Uuid,
    /// e.g. Inspection, Repair, Battery Replacement
    #[validate(
        length(min = 1, max = 100, message = "Issue type must be 1-100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub issue_type: String,
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: String,
    /// Defaults to today
    pub log_date: Option<NaiveDate>,
}

/// Request DTO for a partial maintenance log update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateMaintenanceLogDto {
    #[validate(
        length(min = 1, max = 100, message = "Issue type must be 1-100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub issue_type: Option<String>,
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,
    pub log_date: Option<NaiveDate>,
}

/// Query params for listing maintenance logs
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct MaintenanceLogQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// Only logs for this equipment
    pub equipment_id: Option<Uuid>,
}

impl_paginated!(MaintenanceLogQueryParams);

/// Response DTO for a maintenance log
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceLogResponseDto {
    pub id: Uuid,
    pub equipment_id: Uuid,
    /// `"Unknown Equipment"` when the equipment record is gone
    pub equipment_name: String,
    pub issue_type: String,
    pub description: String,
    pub log_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MaintenanceLogWithEquipment> for MaintenanceLogResponseDto {
    fn from(log: MaintenanceLogWithEquipment) -> Self {
        Self {
            id: log.id,
            equipment_id: log.equipment_id,
            equipment_name: log.equipment_name,
            issue_type: log.issue_type,
            description: log.description,
            log_date: log.log_date,
            created_at: log.created_at,
            updated_at: log.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_issue_type_fails() {
        let dto = CreateMaintenanceLogDto {
            equipment_id: Uuid::new_v4(),
            issue_type: "  ".to_string(),
            description: "Cracked housing".to_string(),
            log_date: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_empty_description_is_allowed() {
        let dto = CreateMaintenanceLogDto {
            equipment_id: Uuid::new_v4(),
            issue_type: "Inspection".to_string(),
            description: String::new(),
            log_date: NaiveDate::from_ymd_opt(2026, 3, 2),
        };
        assert!(dto.validate().is_ok());
    }
}
