use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::personnel::models::Personnel;
use crate::shared::types::{default_page, default_page_size, impl_paginated};
use crate::shared::validation::{validate_certifications, validate_not_blank, PHONE_REGEX};

/// Request DTO for adding a team member
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePersonnelDto {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: String,
    /// e.g. Rescuer, Medic, Pilot, Coordinator
    #[validate(custom(function = "validate_not_blank"))]
    pub role: String,
    /// e.g. ["CPR", "Avalanche L2"]
    #[serde(default)]
    #[validate(custom(function = "validate_certifications"))]
    pub certifications: Vec<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub base_station: String,
    /// Defaults to true
    pub is_available: Option<bool>,
}

/// Request DTO for a partial team member update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePersonnelDto {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub role: Option<String>,
    #[validate(custom(function = "validate_certifications"))]
    pub certifications: Option<Vec<String>>,
    #[validate(custom(function = "validate_not_blank"))]
    pub base_station: Option<String>,
    pub is_available: Option<bool>,
    #[validate(length(max = 5000, message = "Profile summary must not exceed 5000 characters"))]
    pub ai_profile_summary: Option<String>,
}

/// Query params for listing personnel
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PersonnelQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// Filter by availability
    pub is_available: Option<bool>,
    /// Case-insensitive search in name or email
    pub search: Option<String>,
}

impl_paginated!(PersonnelQueryParams);

/// Response DTO for a team member
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PersonnelResponseDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub certifications: Vec<String>,
    pub base_station: String,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_profile_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Personnel> for PersonnelResponseDto {
    fn from(p: Personnel) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            phone: p.phone,
            role: p.role,
            certifications: p.certifications,
            base_station: p.base_station,
            is_available: p.is_available,
            ai_profile_summary: p.ai_profile_summary,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Mission statistics for the personnel detail page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PersonnelStatsDto {
    /// Dispatches whose incident still exists
    pub total_missions: i64,
    pub active_missions: i64,
    pub resolved_missions: i64,
    /// Mission reports authored
    pub total_reports: i64,
    /// Mean difficulty over authored reports; unrated reports count as 0
    pub average_difficulty: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn valid_create() -> CreatePersonnelDto {
        CreatePersonnelDto {
            name: Name().fake(),
            email: SafeEmail().fake(),
            phone: "555-123-4567".to_string(),
            role: "Medic".to_string(),
            certifications: vec!["CPR".to_string(), "Avalanche L2".to_string()],
            base_station: "Valley Base Camp".to_string(),
            is_available: None,
        }
    }

    #[test]
    fn test_valid_personnel_passes() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn test_invalid_email_fails() {
        let mut dto = valid_create();
        dto.email = "not-an-email".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_invalid_phone_fails() {
        let mut dto = valid_create();
        dto.phone = "call me".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_blank_role_and_certification_fail() {
        let mut dto = valid_create();
        dto.role = "  ".to_string();
        assert!(dto.validate().is_err());

        let mut dto = valid_create();
        dto.certifications.push(String::new());
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_validates_present_fields_only() {
        assert!(UpdatePersonnelDto::default().validate().is_ok());

        let update = UpdatePersonnelDto {
            email: Some("broken".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
