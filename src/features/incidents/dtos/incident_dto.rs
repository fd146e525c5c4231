use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::incidents::models::{Incident, IncidentStatus, IncidentType};
use crate::shared::types::{default_page, default_page_size, impl_paginated};

/// GPS position of an incident
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct GpsCoordinatesDto {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
}

/// Request DTO for reporting an incident
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateIncidentDto {
    pub incident_type: IncidentType,
    /// Defaults to `standby`
    pub status: Option<IncidentStatus>,
    #[validate(range(min = 1, max = 5, message = "Severity level must be 1-5"))]
    pub severity_level: i16,
    #[validate(nested)]
    pub gps_coordinates: GpsCoordinatesDto,
    #[validate(length(max = 255, message = "Weather conditions must not exceed 255 characters"))]
    pub weather_conditions: Option<String>,
    /// Defaults to the time of the request
    pub reported_date: Option<DateTime<Utc>>,
}

/// Request DTO for a partial incident update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateIncidentDto {
    pub incident_type: Option<IncidentType>,
    #[validate(range(min = 1, max = 5, message = "Severity level must be 1-5"))]
    pub severity_level: Option<i16>,
    #[validate(nested)]
    pub gps_coordinates: Option<GpsCoordinatesDto>,
    #[validate(length(max = 255, message = "Weather conditions must not exceed 255 characters"))]
    pub weather_conditions: Option<String>,
    pub reported_date: Option<DateTime<Utc>>,
    /// Rejected when present; status changes go through the status endpoint
    #[serde(default, skip_serializing)]
    #[schema(ignore)]
    #[validate(custom(function = "reject_status_change"))]
    pub status: Option<serde_json::Value>,
}

fn reject_status_change(_: &serde_json::Value) -> Result<(), ValidationError> {
    Err(ValidationError::new("status_not_patchable")
        .with_message("use PATCH /api/incidents/{id}/status to change the status".into()))
}

/// Request DTO for changing only the status
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateIncidentStatusDto {
    pub status: IncidentStatus,
}

/// Query params for listing incidents
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct IncidentQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// Filter by status
    pub status: Option<IncidentStatus>,
    /// Filter by incident type
    pub incident_type: Option<IncidentType>,
}

impl_paginated!(IncidentQueryParams);

/// Response DTO for incident
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IncidentResponseDto {
    pub id: Uuid,
    pub incident_type: IncidentType,
    pub status: IncidentStatus,
    pub severity_level: i16,
    pub gps_coordinates: GpsCoordinatesDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_conditions: Option<String>,
    pub reported_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Incident> for IncidentResponseDto {
    fn from(i: Incident) -> Self {
        Self {
            id: i.id,
            incident_type: i.incident_type,
            status: i.status,
            severity_level: i.severity_level,
            gps_coordinates: GpsCoordinatesDto {
                latitude: i.latitude,
                longitude: i.longitude,
            },
            weather_conditions: i.weather_conditions,
            reported_date: i.reported_date,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateIncidentDto {
        CreateIncidentDto {
            incident_type: IncidentType::Avalanche,
            status: None,
            severity_level: 4,
            gps_coordinates: GpsCoordinatesDto {
                latitude: 49.2319,
                longitude: 19.9817,
            },
            weather_conditions: Some("Blizzard".to_string()),
            reported_date: None,
        }
    }

    #[test]
    fn test_valid_incident_passes() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn test_severity_out_of_range_fails() {
        let mut dto = valid_create();
        dto.severity_level = 6;
        assert!(dto.validate().is_err());
        dto.severity_level = 0;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_coordinates_are_validated() {
        let mut dto = valid_create();
        dto.gps_coordinates.latitude = 91.0;
        assert!(dto.validate().is_err());

        let update = UpdateIncidentDto {
            gps_coordinates: Some(GpsCoordinatesDto {
                latitude: 0.0,
                longitude: -181.0,
            }),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_empty_update_is_valid() {
        assert!(UpdateIncidentDto::default().validate().is_ok());
    }

    #[test]
    fn test_update_carrying_status_fails() {
        let update: UpdateIncidentDto =
            serde_json::from_str(r#"{"severity_level": 2, "status": "resolved"}"#).unwrap();
        let err = update.validate().unwrap_err();
        assert!(err.to_string().contains("/status"));

        let update: UpdateIncidentDto = serde_json::from_str(r#"{"severity_level": 2}"#).unwrap();
        assert!(update.validate().is_ok());
    }
}
