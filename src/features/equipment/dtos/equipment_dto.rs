use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::equipment::models::{Equipment, EquipmentStatus};
use crate::shared::types::{default_page, default_page_size, impl_paginated};
use crate::shared::validation::validate_not_blank;

/// Request DTO for registering equipment
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEquipmentDto {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    /// e.g. Vehicle, Medical, Communication, Climbing
    #[validate(
        length(min = 1, max = 100, message = "Category must be 1-100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub category: String,
    /// Defaults to `Available`
    pub status: Option<EquipmentStatus>,
    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,
    pub last_inspected: NaiveDate,
}

/// Request DTO for a partial equipment update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipmentDto {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(
        length(min = 1, max = 100, message = "Category must be 1-100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub category: Option<String>,
    pub status: Option<EquipmentStatus>,
    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,
    pub last_inspected: Option<NaiveDate>,
}

/// Query params for listing equipment
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct EquipmentQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// Filter by status
    pub status: Option<EquipmentStatus>,
    /// Filter by category (exact, case-insensitive)
    pub category: Option<String>,
}

impl_paginated!(EquipmentQueryParams);

/// Response DTO for equipment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EquipmentResponseDto {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub status: EquipmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub last_inspected: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Equipment> for EquipmentResponseDto {
    fn from(e: Equipment) -> Self {
        Self {
            id: e.id,
            name: e.name,
            category: e.category,
            status: e.status,
            image: e.image,
            last_inspected: e.last_inspected,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateEquipmentDto {
        CreateEquipmentDto {
            name: "Avalanche Transceiver".to_string(),
            category: "Communication".to_string(),
            status: None,
            image: Some("https://cdn.example.com/equipment/transceiver.png".to_string()),
            last_inspected: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        }
    }

    #[test]
    fn test_valid_equipment_passes() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn test_blank_name_fails() {
        let mut dto = valid_create();
        dto.name = "   ".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_bad_image_url_fails() {
        let mut dto = valid_create();
        dto.image = Some("not a url".to_string());
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_status_label_deserializes() {
        let dto: UpdateEquipmentDto =
            serde_json::from_str(r#"{"status": "In Use"}"#).unwrap();
        assert_eq!(dto.status, Some(EquipmentStatus::InUse));
    }
}
