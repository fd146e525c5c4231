use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::personnel::dtos::{
    CreatePersonnelDto, PersonnelQueryParams, PersonnelResponseDto, PersonnelStatsDto,
    UpdatePersonnelDto,
};
use crate::features::personnel::models::{Personnel, PersonnelStats};
use crate::shared::types::{Page, Paginated};

const PERSONNEL_COLUMNS: &str = r#"
    id, name, email, phone, role, certifications, base_station,
    is_available, ai_profile_summary, created_at, updated_at
"#;

/// Service for rescue personnel
pub struct PersonnelService {
    pool: PgPool,
}

impl PersonnelService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List personnel ordered by name
    pub async fn list(&self, params: &PersonnelQueryParams) -> Result<Page<PersonnelResponseDto>> {
        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM personnel
            WHERE ($1::boolean IS NULL OR is_available = $1)
              AND ($2::text IS NULL
                   OR strpos(lower(name), lower($2)) > 0
                   OR strpos(lower(email), lower($2)) > 0)
            "#,
        )
        .bind(params.is_available)
        .bind(search)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count personnel: {:?}", e);
            AppError::Database(e)
        })?;

        let rows = sqlx::query_as::<_, Personnel>(&format!(
            r#"
            SELECT {PERSONNEL_COLUMNS}
            FROM personnel
            WHERE ($1::boolean IS NULL OR is_available = $1)
              AND ($2::text IS NULL
                   OR strpos(lower(name), lower($2)) > 0
                   OR strpos(lower(email), lower($2)) > 0)
            ORDER BY name, id
            OFFSET $3 LIMIT $4
            "#
        ))
        .bind(params.is_available)
        .bind(search)
        .bind(params.offset())
        .bind(params.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list personnel: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    /// Get a team member by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<PersonnelResponseDto> {
        let person = sqlx::query_as::<_, Personnel>(&format!(
            "SELECT {PERSONNEL_COLUMNS} FROM personnel WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get personnel by ID: {:?}", e);
            AppError::Database(e)
        })?;

        person
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Personnel '{}' not found", id)))
    }

    /// Get a team member by email
    pub async fn get_by_email(&self, email: &str) -> Result<PersonnelResponseDto> {
        let person = sqlx::query_as::<_, Personnel>(&format!(
            "SELECT {PERSONNEL_COLUMNS} FROM personnel WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get personnel by email: {:?}", e);
            AppError::Database(e)
        })?;

        person.map(Into::into).ok_or_else(|| {
            AppError::NotFound(format!("Personnel with email '{}' not found", email))
        })
    }

    /// Add a team member
    pub async fn create(&self, dto: CreatePersonnelDto) -> Result<PersonnelResponseDto> {
        let person = sqlx::query_as::<_, Personnel>(&format!(
            r#"
            INSERT INTO personnel (
                name, email, phone, role, certifications, base_station, is_available
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PERSONNEL_COLUMNS}
            "#
        ))
        .bind(dto.name.trim())
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(dto.role.trim())
        .bind(&dto.certifications)
        .bind(dto.base_station.trim())
        .bind(dto.is_available.unwrap_or(true))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to create personnel"))?;

        tracing::info!(
            "Personnel created: id={}, role={}, station={}",
            person.id,
            person.role,
            person.base_station
        );

        Ok(person.into())
    }

    /// Partially update a team member
    pub async fn update(&self, id: Uuid, dto: UpdatePersonnelDto) -> Result<PersonnelResponseDto> {
        let person = sqlx::query_as::<_, Personnel>(&format!(
            r#"
            UPDATE personnel SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                role = COALESCE($5, role),
                certifications = COALESCE($6, certifications),
                base_station = COALESCE($7, base_station),
                is_available = COALESCE($8, is_available),
                ai_profile_summary = COALESCE($9, ai_profile_summary),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PERSONNEL_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.email)
        .bind(dto.phone)
        .bind(dto.role.as_deref().map(str::trim))
        .bind(dto.certifications)
        .bind(dto.base_station.as_deref().map(str::trim))
        .bind(dto.is_available)
        .bind(dto.ai_profile_summary)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Failed to update personnel"))?
        .ok_or_else(|| AppError::NotFound(format!("Personnel '{}' not found", id)))?;

        tracing::info!("Personnel updated: id={}", person.id);

        Ok(person.into())
    }

    /// Delete a team member.
    ///
    /// Their dispatches stay on record without the personnel link; their mission
    /// reports are removed.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // Referencing dispatches are cleared, so their incidents lock first
        sqlx::query(
            r#"
            SELECT i.id FROM incidents i
            WHERE i.id IN (SELECT incident_id FROM dispatches WHERE personnel_id = $1)
            ORDER BY i.id
            FOR UPDATE
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to lock incidents for personnel: {:?}", e);
            AppError::Database(e)
        })?;

        let result = sqlx::query("DELETE FROM personnel WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_db(e, "Failed to delete personnel"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Personnel '{}' not found", id)));
        }

        tx.commit().await?;

        tracing::info!("Personnel deleted: id={}", id);
        Ok(())
    }

    /// Mission and report statistics for one team member
    pub async fn detail_stats(&self, id: Uuid) -> Result<PersonnelStatsDto> {
        // 404 before aggregating over nothing
        self.get_by_id(id).await?;

        let missions = sqlx::query_as::<_, PersonnelStats>(
            r#"
            SELECT
                COUNT(*) AS total_missions,
                COUNT(*) FILTER (WHERE i.status = 'active') AS active_missions,
                COUNT(*) FILTER (WHERE i.status = 'resolved') AS resolved_missions
            FROM dispatches d
            JOIN incidents i ON i.id = d.incident_id
            WHERE d.personnel_id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to aggregate personnel missions: {:?}", e);
            AppError::Database(e)
        })?;

        let (total_reports, average_difficulty): (i64, Option<f64>) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                AVG(COALESCE(difficulty_rating, 0))::float8
            FROM mission_reports
            WHERE reporter_id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to aggregate personnel reports: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(PersonnelStatsDto {
            total_missions: missions.total_missions,
            active_missions: missions.active_missions,
            resolved_missions: missions.resolved_missions,
            total_reports,
            average_difficulty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::dispatches::dtos::CreateDispatchDto;
    use crate::features::dispatches::services::DispatchService;
    use crate::features::incidents::models::IncidentStatus;
    use crate::shared::test_helpers::{insert_incident, insert_personnel};

    #[sqlx::test]
    async fn test_search_matches_wildcards_literally(pool: PgPool) {
        insert_personnel(&pool, "Marta Zielinska", "marta@example.com").await;
        insert_personnel(&pool, "Piotr Wisniewski", "piotr_w@example.com").await;
        let service = PersonnelService::new(pool.clone());

        let page = service
            .list(&PersonnelQueryParams {
                page: 1,
                page_size: 10,
                is_available: None,
                search: Some("_".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].email, "piotr_w@example.com");
    }

    #[sqlx::test]
    async fn test_deleting_dispatched_person_keeps_the_dispatch(pool: PgPool) {
        let incident = insert_incident(&pool, IncidentStatus::Active).await;
        let person = insert_personnel(&pool, "Marta Zielinska", "marta@example.com").await;
        let created = DispatchService::new(pool.clone())
            .create(CreateDispatchDto {
                incident_id: incident,
                personnel_id: Some(person),
                equipment_id: None,
                dispatch_time: None,
            })
            .await
            .unwrap();

        PersonnelService::new(pool.clone()).delete(person).await.unwrap();

        let dispatch = DispatchService::new(pool.clone())
            .get_by_id(created.id)
            .await
            .unwrap();
        assert_eq!(dispatch.personnel_id, None);
    }
}
