use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::dispatches::models::Dispatch;

/// Request DTO for dispatching resources to an incident
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_has_resource"))]
pub struct CreateDispatchDto {
    pub incident_id: Uuid,
    pub personnel_id: Option<Uuid>,
    pub equipment_id: Option<Uuid>,
    /// Defaults to the time of the request
    pub dispatch_time: Option<DateTime<Utc>>,
}

fn validate_has_resource(dto: &CreateDispatchDto) -> Result<(), ValidationError> {
    if dto.personnel_id.is_none() && dto.equipment_id.is_none() {
        return Err(ValidationError::new("missing_resource")
            .with_message("A dispatch needs personnel_id or equipment_id".into()));
    }
    Ok(())
}

/// Request DTO for a partial dispatch update.
///
/// A resource given here replaces the current one; omitted fields are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateDispatchDto {
    pub personnel_id: Option<Uuid>,
    pub equipment_id: Option<Uuid>,
    pub dispatch_time: Option<DateTime<Utc>>,
}

/// Response DTO for dispatch
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DispatchResponseDto {
    pub id: Uuid,
    pub incident_id: Uuid,
    pub personnel_id: Option<Uuid>,
    pub equipment_id: Option<Uuid>,
    pub dispatch_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Dispatch> for DispatchResponseDto {
    fn from(d: Dispatch) -> Self {
        Self {
            id: d.id,
            incident_id: d.incident_id,
            personnel_id: d.personnel_id,
            equipment_id: d.equipment_id,
            dispatch_time: d.dispatch_time,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_needs_a_resource() {
        let dto = CreateDispatchDto {
            incident_id: Uuid::new_v4(),
            personnel_id: None,
            equipment_id: None,
            dispatch_time: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_either_resource_is_enough() {
        let with_person = CreateDispatchDto {
            incident_id: Uuid::new_v4(),
            personnel_id: Some(Uuid::new_v4()),
            equipment_id: None,
            dispatch_time: None,
        };
        assert!(with_person.validate().is_ok());

        let with_equipment = CreateDispatchDto {
            personnel_id: None,
            equipment_id: Some(Uuid::new_v4()),
            ..with_person
        };
        assert!(with_equipment.validate().is_ok());
    }
}
