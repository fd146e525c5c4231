use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::features::dispatches::dtos::DispatchResponseDto;
use crate::features::equipment::dtos::EquipmentResponseDto;
use crate::features::incidents::dtos::IncidentResponseDto;
use crate::features::maintenance_logs::dtos::MaintenanceLogResponseDto;
use crate::features::personnel::dtos::PersonnelResponseDto;

// ============================================================================
// Summary
// ============================================================================

/// Headline counters for the operations dashboard
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DashboardSummaryDto {
    pub active_incidents: i64,
    pub total_incidents: i64,
    pub available_personnel: i64,
    pub total_personnel: i64,
    pub available_equipment: i64,
    pub total_equipment: i64,
    pub maintenance_logs: i64,
}

// ============================================================================
// Export
// ============================================================================

/// Raw operational data handed to the external report service
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OperationsExportDto {
    pub generated_at: DateTime<Utc>,
    pub incidents: Vec<IncidentResponseDto>,
    pub personnel: Vec<PersonnelResponseDto>,
    pub equipment: Vec<EquipmentResponseDto>,
    pub maintenance_logs: Vec<MaintenanceLogResponseDto>,
    pub dispatches: Vec<DispatchResponseDto>,
}
