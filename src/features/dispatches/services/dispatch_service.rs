use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::dispatches::dtos::{
    CreateDispatchDto, DispatchResponseDto, UpdateDispatchDto,
};
use crate::features::dispatches::models::Dispatch;
use crate::features::dispatches::services::availability;
use crate::features::incidents::models::IncidentStatus;
use crate::shared::types::{Page, Paginated, PaginationQuery};

const DISPATCH_COLUMNS: &str = r#"
    id, incident_id, personnel_id, equipment_id, dispatch_time, created_at, updated_at
"#;

/// Service for dispatches and the availability of the resources they hold
pub struct DispatchService {
    pool: PgPool,
}

impl DispatchService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List dispatches, newest first
    pub async fn list(&self, params: &PaginationQuery) -> Result<Page<DispatchResponseDto>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dispatches")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count dispatches: {:?}", e);
                AppError::Database(e)
            })?;

        let rows = sqlx::query_as::<_, Dispatch>(&format!(
            r#"
            SELECT {DISPATCH_COLUMNS}
            FROM dispatches
            ORDER BY dispatch_time DESC, id
            OFFSET $1 LIMIT $2
            "#
        ))
        .bind(params.offset())
        .bind(params.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list dispatches: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    /// List the dispatches of one incident, newest first
    pub async fn list_by_incident(
        &self,
        incident_id: Uuid,
        params: &PaginationQuery,
    ) -> Result<Page<DispatchResponseDto>> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM incidents WHERE id = $1)")
                .bind(incident_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to check incident: {:?}", e);
                    AppError::Database(e)
                })?;

        if !exists {
            return Err(AppError::NotFound(format!(
                "Incident '{}' not found",
                incident_id
            )));
        }

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM dispatches WHERE incident_id = $1")
                .bind(incident_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count incident dispatches: {:?}", e);
                    AppError::Database(e)
                })?;

        let rows = sqlx::query_as::<_, Dispatch>(&format!(
            r#"
            SELECT {DISPATCH_COLUMNS}
            FROM dispatches
            WHERE incident_id = $1
            ORDER BY dispatch_time DESC, id
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(incident_id)
        .bind(params.offset())
        .bind(params.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list incident dispatches: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    /// Get a dispatch by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<DispatchResponseDto> {
        sqlx::query_as::<_, Dispatch>(&format!(
            "SELECT {DISPATCH_COLUMNS} FROM dispatches WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get dispatch by ID: {:?}", e);
            AppError::Database(e)
        })?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("Dispatch '{}' not found", id)))
    }

    /// Dispatch resources to an incident.
    ///
    /// Claims the personnel and equipment, and activates a standby incident.
    pub async fn create(&self, dto: CreateDispatchDto) -> Result<DispatchResponseDto> {
        let mut tx = self.pool.begin().await?;

        let status = availability::lock_incident(&mut tx, dto.incident_id).await?;

        if !status.accepts_dispatches() {
            return Err(AppError::Conflict(format!(
                "Incident '{}' is {} and accepts no dispatches",
                dto.incident_id, status
            )));
        }

        if let Some(personnel_id) = dto.personnel_id {
            availability::claim_personnel(&mut tx, personnel_id).await?;
        }
        if let Some(equipment_id) = dto.equipment_id {
            availability::claim_equipment(&mut tx, equipment_id).await?;
        }

        let dispatch = sqlx::query_as::<_, Dispatch>(&format!(
            r#"
            INSERT INTO dispatches (incident_id, personnel_id, equipment_id, dispatch_time)
            VALUES ($1, $2, $3, $4)
            RETURNING {DISPATCH_COLUMNS}
            "#
        ))
        .bind(dto.incident_id)
        .bind(dto.personnel_id)
        .bind(dto.equipment_id)
        .bind(dto.dispatch_time.unwrap_or_else(Utc::now))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to create dispatch"))?;

        if status == IncidentStatus::Standby {
            sqlx::query("UPDATE incidents SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(dto.incident_id)
                .bind(IncidentStatus::Active)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::from_db(e, "Failed to activate incident"))?;

            tracing::info!("Incident activated by dispatch: id={}", dto.incident_id);
        }

        tx.commit().await?;

        tracing::info!(
            "Dispatch created: id={}, incident_id={}, personnel_id={:?}, equipment_id={:?}",
            dispatch.id,
            dispatch.incident_id,
            dispatch.personnel_id,
            dispatch.equipment_id
        );

        Ok(dispatch.into())
    }

    /// Partially update a dispatch, swapping resources where requested
    pub async fn update(&self, id: Uuid, dto: UpdateDispatchDto) -> Result<DispatchResponseDto> {
        let mut tx = self.pool.begin().await?;

        let incident_id = incident_of(&mut tx, id).await?;
        let status = availability::lock_incident(&mut tx, incident_id).await?;

        let current = sqlx::query_as::<_, Dispatch>(&format!(
            "SELECT {DISPATCH_COLUMNS} FROM dispatches WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to lock dispatch: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Dispatch '{}' not found", id)))?;

        let personnel = availability::plan_reassignment(current.personnel_id, dto.personnel_id);
        let equipment = availability::plan_reassignment(current.equipment_id, dto.equipment_id);

        if (personnel.claim.is_some() || equipment.claim.is_some()) && !status.accepts_dispatches()
        {
            return Err(AppError::Conflict(format!(
                "Incident '{}' is {}; its dispatches cannot take new resources",
                current.incident_id, status
            )));
        }

        let mut personnel_ids: Vec<Uuid> =
            personnel.claim.into_iter().chain(personnel.release).collect();
        let mut equipment_ids: Vec<Uuid> =
            equipment.claim.into_iter().chain(equipment.release).collect();
        personnel_ids.sort();
        equipment_ids.sort();
        availability::lock_resources(&mut tx, &personnel_ids, &equipment_ids).await?;

        if let Some(personnel_id) = personnel.claim {
            availability::claim_personnel(&mut tx, personnel_id).await?;
        }
        if let Some(equipment_id) = equipment.claim {
            availability::claim_equipment(&mut tx, equipment_id).await?;
        }

        let dispatch = sqlx::query_as::<_, Dispatch>(&format!(
            r#"
            UPDATE dispatches SET
                personnel_id = COALESCE($2, personnel_id),
                equipment_id = COALESCE($3, equipment_id),
                dispatch_time = COALESCE($4, dispatch_time),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {DISPATCH_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(dto.personnel_id)
        .bind(dto.equipment_id)
        .bind(dto.dispatch_time)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to update dispatch"))?;

        if let Some(personnel_id) = personnel.release {
            availability::release_personnel(&mut tx, personnel_id).await?;
        }
        if let Some(equipment_id) = equipment.release {
            availability::release_equipment(&mut tx, equipment_id).await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Dispatch updated: id={}, personnel_id={:?}, equipment_id={:?}",
            dispatch.id,
            dispatch.personnel_id,
            dispatch.equipment_id
        );

        Ok(dispatch.into())
    }

    /// Delete a dispatch and release what it held
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let incident_id = incident_of(&mut tx, id).await?;
        availability::lock_incident(&mut tx, incident_id).await?;

        let (personnel_id, equipment_id): (Option<Uuid>, Option<Uuid>) = sqlx::query_as(
            "DELETE FROM dispatches WHERE id = $1 RETURNING personnel_id, equipment_id",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to delete dispatch"))?
        .ok_or_else(|| AppError::NotFound(format!("Dispatch '{}' not found", id)))?;

        if let Some(personnel_id) = personnel_id {
            availability::release_personnel(&mut tx, personnel_id).await?;
        }
        if let Some(equipment_id) = equipment_id {
            availability::release_equipment(&mut tx, equipment_id).await?;
        }

        tx.commit().await?;

        tracing::info!("Dispatch deleted: id={}", id);
        Ok(())
    }
}

/// The incident a dispatch belongs to; dispatches never change incident
async fn incident_of(conn: &mut PgConnection, id: Uuid) -> Result<Uuid> {
    sqlx::query_scalar("SELECT incident_id FROM dispatches WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find dispatch: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Dispatch '{}' not found", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::equipment::models::EquipmentStatus;
    use crate::features::equipment::services::EquipmentService;
    use crate::features::personnel::services::PersonnelService;
    use crate::shared::test_helpers::{insert_equipment, insert_incident, insert_personnel};

    fn dispatch(
        incident_id: Uuid,
        personnel_id: Option<Uuid>,
        equipment_id: Option<Uuid>,
    ) -> CreateDispatchDto {
        CreateDispatchDto {
            incident_id,
            personnel_id,
            equipment_id,
            dispatch_time: None,
        }
    }

    #[sqlx::test]
    async fn test_dispatch_claims_resources_and_activates_incident(pool: PgPool) {
        let incident = insert_incident(&pool, IncidentStatus::Standby).await;
        let person = insert_personnel(&pool, "Marta Zielinska", "marta@example.com").await;
        let sled = insert_equipment(&pool, "Rescue sled").await;

        DispatchService::new(pool.clone())
            .create(dispatch(incident, Some(person), Some(sled)))
            .await
            .unwrap();

        let status: IncidentStatus =
            sqlx::query_scalar("SELECT status FROM incidents WHERE id = $1")
                .bind(incident)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, IncidentStatus::Active);
        let person = PersonnelService::new(pool.clone()).get_by_id(person).await.unwrap();
        assert!(!person.is_available);
        assert_eq!(
            EquipmentService::new(pool.clone()).get_by_id(sled).await.unwrap().status,
            EquipmentStatus::InUse
        );
    }

    #[sqlx::test]
    async fn test_claiming_a_dispatched_person_conflicts(pool: PgPool) {
        let first = insert_incident(&pool, IncidentStatus::Active).await;
        let second = insert_incident(&pool, IncidentStatus::Standby).await;
        let person = insert_personnel(&pool, "Marta Zielinska", "marta@example.com").await;
        let service = DispatchService::new(pool.clone());

        service.create(dispatch(first, Some(person), None)).await.unwrap();
        let err = service
            .create(dispatch(second, Some(person), None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM dispatches WHERE incident_id = $1")
                .bind(second)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 0);
    }

    #[sqlx::test]
    async fn test_resolved_incident_takes_no_dispatches(pool: PgPool) {
        let incident = insert_incident(&pool, IncidentStatus::Resolved).await;
        let person = insert_personnel(&pool, "Marta Zielinska", "marta@example.com").await;

        let err = DispatchService::new(pool.clone())
            .create(dispatch(incident, Some(person), None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        let person = PersonnelService::new(pool.clone()).get_by_id(person).await.unwrap();
        assert!(person.is_available);
    }

    #[sqlx::test]
    async fn test_swapping_personnel_releases_the_previous_one(pool: PgPool) {
        let incident = insert_incident(&pool, IncidentStatus::Active).await;
        let first = insert_personnel(&pool, "Marta Zielinska", "marta@example.com").await;
        let second = insert_personnel(&pool, "Piotr Wisniewski", "piotr@example.com").await;
        let service = DispatchService::new(pool.clone());
        let personnel = PersonnelService::new(pool.clone());

        let created = service
            .create(dispatch(incident, Some(first), None))
            .await
            .unwrap();
        let updated = service
            .update(
                created.id,
                UpdateDispatchDto {
                    personnel_id: Some(second),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.personnel_id, Some(second));
        assert!(personnel.get_by_id(first).await.unwrap().is_available);
        assert!(!personnel.get_by_id(second).await.unwrap().is_available);

        service.delete(created.id).await.unwrap();
        assert!(personnel.get_by_id(second).await.unwrap().is_available);
    }

    #[sqlx::test]
    async fn test_concurrent_swaps_keep_availability_consistent(pool: PgPool) {
        let incident = insert_incident(&pool, IncidentStatus::Active).await;
        let service = std::sync::Arc::new(DispatchService::new(pool.clone()));

        let mut pairs = Vec::new();
        for i in 0..4 {
            let current = insert_personnel(&pool, "Team A", &format!("a{i}@example.com")).await;
            let spare = insert_personnel(&pool, "Team B", &format!("b{i}@example.com")).await;
            let created = service
                .create(dispatch(incident, Some(current), None))
                .await
                .unwrap();
            pairs.push((created.id, current, spare));
        }

        let mut handles = Vec::new();
        for round in 0..6 {
            for (dispatch_id, current, spare) in pairs.clone() {
                let service = service.clone();
                let next = if round % 2 == 0 { spare } else { current };
                handles.push(tokio::spawn(async move {
                    service
                        .update(
                            dispatch_id,
                            UpdateDispatchDto {
                                personnel_id: Some(next),
                                ..Default::default()
                            },
                        )
                        .await
                }));
            }
        }

        for handle in handles {
            let result = handle.await.unwrap();
            assert!(result.is_ok(), "swap failed: {:?}", result);
        }

        let personnel = PersonnelService::new(pool.clone());
        for (dispatch_id, current, spare) in pairs {
            let assigned = service.get_by_id(dispatch_id).await.unwrap().personnel_id;
            for person in [current, spare] {
                let available = personnel.get_by_id(person).await.unwrap().is_available;
                assert_eq!(available, assigned != Some(person));
            }
        }
    }
}
