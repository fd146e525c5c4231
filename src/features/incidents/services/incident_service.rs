use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::dispatches::services::availability;
use crate::features::incidents::dtos::{
    CreateIncidentDto, IncidentQueryParams, IncidentResponseDto, UpdateIncidentDto,
};
use crate::features::incidents::models::{Incident, IncidentStatus};
use crate::shared::types::{Page, Paginated};

const INCIDENT_COLUMNS: &str = r#"
    id, incident_type, status, severity_level, latitude, longitude,
    weather_conditions, reported_date, created_at, updated_at
"#;

/// Service for incident operations
pub struct IncidentService {
    pool: PgPool,
}

impl IncidentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List incidents, newest report first
    pub async fn list(&self, params: &IncidentQueryParams) -> Result<Page<IncidentResponseDto>> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM incidents
            WHERE ($1::incident_status IS NULL OR status = $1)
              AND ($2::incident_type IS NULL OR incident_type = $2)
            "#,
        )
        .bind(params.status)
        .bind(params.incident_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count incidents: {:?}", e);
            AppError::Database(e)
        })?;

        let incidents = sqlx::query_as::<_, Incident>(&format!(
            r#"
            SELECT {INCIDENT_COLUMNS}
            FROM incidents
            WHERE ($1::incident_status IS NULL OR status = $1)
              AND ($2::incident_type IS NULL OR incident_type = $2)
            ORDER BY reported_date DESC, id
            OFFSET $3 LIMIT $4
            "#
        ))
        .bind(params.status)
        .bind(params.incident_type)
        .bind(params.offset())
        .bind(params.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list incidents: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(Page {
            items: incidents.into_iter().map(Into::into).collect(),
            total,
        })
    }

    /// Get incident by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<IncidentResponseDto> {
        let incident = sqlx::query_as::<_, Incident>(&format!(
            "SELECT {INCIDENT_COLUMNS} FROM incidents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get incident by ID: {:?}", e);
            AppError::Database(e)
        })?;

        incident
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Incident '{}' not found", id)))
    }

    /// Report a new incident
    pub async fn create(&self, dto: CreateIncidentDto) -> Result<IncidentResponseDto> {
        let incident = sqlx::query_as::<_, Incident>(&format!(
            r#"
            INSERT INTO incidents (
                incident_type, status, severity_level, latitude, longitude,
                weather_conditions, reported_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {INCIDENT_COLUMNS}
            "#
        ))
        .bind(dto.incident_type)
        .bind(dto.status.unwrap_or(IncidentStatus::Standby))
        .bind(dto.severity_level)
        .bind(dto.gps_coordinates.latitude)
        .bind(dto.gps_coordinates.longitude)
        .bind(dto.weather_conditions)
        .bind(dto.reported_date.unwrap_or_else(Utc::now))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to create incident"))?;

        tracing::info!(
            "Incident created: id={}, type={}, severity={}",
            incident.id,
            incident.incident_type,
            incident.severity_level
        );

        Ok(incident.into())
    }

    /// Partially update incident details (status has its own operation)
    pub async fn update(&self, id: Uuid, dto: UpdateIncidentDto) -> Result<IncidentResponseDto> {
        let incident = sqlx::query_as::<_, Incident>(&format!(
            r#"
            UPDATE incidents SET
                incident_type = COALESCE($2, incident_type),
                severity_level = COALESCE($3, severity_level),
                latitude = COALESCE($4, latitude),
                longitude = COALESCE($5, longitude),
                weather_conditions = COALESCE($6, weather_conditions),
                reported_date = COALESCE($7, reported_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {INCIDENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(dto.incident_type)
        .bind(dto.severity_level)
        .bind(dto.gps_coordinates.map(|c| c.latitude))
        .bind(dto.gps_coordinates.map(|c| c.longitude))
        .bind(dto.weather_conditions)
        .bind(dto.reported_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to update incident"))?
        .ok_or_else(|| AppError::NotFound(format!("Incident '{}' not found", id)))?;

        tracing::info!("Incident updated: id={}", incident.id);

        Ok(incident.into())
    }

    /// Change incident status; resolving frees every dispatched resource
    pub async fn update_status(
        &self,
        id: Uuid,
        status: IncidentStatus,
    ) -> Result<IncidentResponseDto> {
        let mut tx = self.pool.begin().await?;

        let previous = availability::lock_incident(&mut tx, id).await?;

        let incident = sqlx::query_as::<_, Incident>(&format!(
            r#"
            UPDATE incidents SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {INCIDENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to update incident status"))?;

        if previous.releases_resources_on(status) {
            let resources = availability::resources_for_incident(&mut tx, id).await?;
            availability::release_all(&mut tx, &resources).await?;
            tracing::info!(
                "Incident resolved, resources released: id={}, personnel={}, equipment={}",
                id,
                resources.personnel_ids.len(),
                resources.equipment_ids.len()
            );
        }

        tx.commit().await?;

        tracing::info!(
            "Incident status changed: id={}, {} -> {}",
            id,
            previous,
            status
        );

        Ok(incident.into())
    }

    /// Delete an incident with its dispatches and mission reports
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        availability::lock_incident(&mut tx, id).await?;
        let resources = availability::resources_for_incident(&mut tx, id).await?;

        sqlx::query("DELETE FROM incidents WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_db(e, "Failed to delete incident"))?;

        availability::release_all(&mut tx, &resources).await?;
        tx.commit().await?;

        tracing::info!("Incident deleted: id={}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::dispatches::dtos::CreateDispatchDto;
    use crate::features::dispatches::services::DispatchService;
    use crate::features::equipment::models::EquipmentStatus;
    use crate::features::equipment::services::EquipmentService;
    use crate::features::personnel::services::PersonnelService;
    use crate::shared::test_helpers::{insert_equipment, insert_incident, insert_personnel};

    async fn dispatched(pool: &PgPool, incident_id: Uuid) -> (Uuid, Uuid) {
        let person = insert_personnel(pool, "Marta Zielinska", "marta@example.com").await;
        let sled = insert_equipment(pool, "Rescue sled").await;
        DispatchService::new(pool.clone())
            .create(CreateDispatchDto {
                incident_id,
                personnel_id: Some(person),
                equipment_id: Some(sled),
                dispatch_time: None,
            })
            .await
            .unwrap();
        (person, sled)
    }

    async fn assert_released(pool: &PgPool, person: Uuid, sled: Uuid) {
        let person = PersonnelService::new(pool.clone()).get_by_id(person).await.unwrap();
        assert!(person.is_available);
        let sled = EquipmentService::new(pool.clone()).get_by_id(sled).await.unwrap();
        assert_eq!(sled.status, EquipmentStatus::Available);
    }

    #[sqlx::test]
    async fn test_resolving_releases_dispatched_resources(pool: PgPool) {
        let incident = insert_incident(&pool, IncidentStatus::Active).await;
        let (person, sled) = dispatched(&pool, incident).await;
        let service = IncidentService::new(pool.clone());

        let resolved = service
            .update_status(incident, IncidentStatus::Resolved)
            .await
            .unwrap();

        assert_eq!(resolved.status, IncidentStatus::Resolved);
        assert_released(&pool, person, sled).await;

        // Dispatch rows stay as history
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM dispatches WHERE incident_id = $1")
                .bind(incident)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test]
    async fn test_deleting_releases_dispatched_resources(pool: PgPool) {
        let incident = insert_incident(&pool, IncidentStatus::Active).await;
        let (person, sled) = dispatched(&pool, incident).await;
        let service = IncidentService::new(pool.clone());

        service.delete(incident).await.unwrap();

        assert_released(&pool, person, sled).await;
        assert!(matches!(
            service.get_by_id(incident).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[sqlx::test]
    async fn test_deleting_missing_incident_is_not_found(pool: PgPool) {
        let err = IncidentService::new(pool.clone())
            .delete(Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
