use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::mission_reports::models::MissionReportWithContext;
use crate::shared::types::{default_page, default_page_size, impl_paginated};

/// Request DTO for filing a mission report
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMissionReportDto {
    pub incident_id: Uuid,
    pub reporter_id: Uuid,
    #[validate(range(min = 1, max = 5, message = "Difficulty rating must be 1-5"))]
    pub difficulty_rating: Option<i16>,
    #[validate(length(max = 10000, message = "Notes must not exceed 10000 characters"))]
    pub notes: String,
    /// Defaults to the time of the request
    pub report_date: Option<DateTime<Utc>>,
}

/// Request DTO for a partial mission report update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateMissionReportDto {
    #[validate(range(min = 1, max = 5, message = "Difficulty rating must be 1-5"))]
    pub difficulty_rating: Option<i16>,
    #[validate(length(max = 10000, message = "Notes must not exceed 10000 characters"))]
    pub notes: Option<String>,
}

/// Query params for listing mission reports
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct MissionReportQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    pub incident_id: Option<Uuid>,
    pub reporter_id: Option<Uuid>,
}

impl_paginated!(MissionReportQueryParams);

/// Response DTO for a mission report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MissionReportResponseDto {
    pub id: Uuid,
    pub incident_id: Uuid,
    /// `"Unknown"` when the incident is gone
    pub incident_type: String,
    pub reporter_id: Uuid,
    /// `"Unknown"` when the reporter is gone
    pub reporter_name: String,
    pub difficulty_rating: Option<i16>,
    pub notes: String,
    pub report_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MissionReportWithContext> for MissionReportResponseDto {
    fn from(r: MissionReportWithContext) -> Self {
        Self {
            id: r.id,
            incident_id: r.incident_id,
            incident_type: r.incident_type,
            reporter_id: r.reporter_id,
            reporter_name: r.reporter_name,
            difficulty_rating: r.difficulty_rating,
            notes: r.notes,
            report_date: r.report_date,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
