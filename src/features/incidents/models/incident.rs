use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Kind of rescue event, matching the `incident_type` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "incident_type")]
pub enum IncidentType {
    Avalanche,
    #[sqlx(rename = "Missing Person")]
    #[serde(rename = "Missing Person")]
    MissingPerson,
    #[sqlx(rename = "Medical Emergency")]
    #[serde(rename = "Medical Emergency")]
    MedicalEmergency,
    #[sqlx(rename = "Fall / Injury")]
    #[serde(rename = "Fall / Injury")]
    FallInjury,
    Other,
}

impl std::fmt::Display for IncidentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentType::Avalanche => write!(f, "Avalanche"),
            IncidentType::MissingPerson => write!(f, "Missing Person"),
            IncidentType::MedicalEmergency => write!(f, "Medical Emergency"),
            IncidentType::FallInjury => write!(f, "Fall / Injury"),
            IncidentType::Other => write!(f, "Other"),
        }
    }
}

/// Incident lifecycle status matching the `incident_status` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "incident_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Standby,
    Active,
    Resolved,
}

impl IncidentStatus {
    /// Whether moving from `self` to `next` frees the resources dispatched to the incident
    pub fn releases_resources_on(self, next: IncidentStatus) -> bool {
        self != IncidentStatus::Resolved && next == IncidentStatus::Resolved
    }

    /// Whether new dispatches may still be attached
    pub fn accepts_dispatches(self) -> bool {
        self != IncidentStatus::Resolved
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentStatus::Standby => write!(f, "standby"),
            IncidentStatus::Active => write!(f, "active"),
            IncidentStatus::Resolved => write!(f, "resolved"),
        }
    }
}

/// Database model for incident
#[derive(Debug, Clone, FromRow)]
pub struct Incident {
    pub id: Uuid,
    pub incident_type: IncidentType,
    pub status: IncidentStatus,
    pub severity_level: i16,
    pub latitude: f64,
    pub longitude: f64,
    pub weather_conditions: Option<String>,
    pub reported_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_resolving_releases_resources() {
        assert!(IncidentStatus::Active.releases_resources_on(IncidentStatus::Resolved));
        assert!(IncidentStatus::Standby.releases_resources_on(IncidentStatus::Resolved));
        assert!(!IncidentStatus::Resolved.releases_resources_on(IncidentStatus::Resolved));
        assert!(!IncidentStatus::Standby.releases_resources_on(IncidentStatus::Active));
        assert!(!IncidentStatus::Resolved.releases_resources_on(IncidentStatus::Active));
    }

    #[test]
    fn test_incident_type_wire_names() {
        let json = serde_json::to_string(&IncidentType::FallInjury).unwrap();
        assert_eq!(json, "\"Fall / Injury\"");

        let parsed: IncidentType = serde_json::from_str("\"Missing Person\"").unwrap();
        assert_eq!(parsed, IncidentType::MissingPerson);
        assert_eq!(parsed.to_string(), "Missing Person");
    }

    #[test]
    fn test_status_is_lowercase_on_the_wire() {
        let parsed: IncidentStatus = serde_json::from_str("\"resolved\"").unwrap();
        assert_eq!(parsed, IncidentStatus::Resolved);
        assert!(!parsed.accepts_dispatches());
        assert!(serde_json::from_str::<IncidentStatus>("\"Resolved\"").is_err());
    }
}
