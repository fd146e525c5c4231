//! Availability bookkeeping for dispatched resources.
//!
//! Every function runs on a connection borrowed from an open database transaction.
//! Claims lock the resource row before checking it. Releases are issued after the
//! referencing dispatch rows have changed, and only free a resource that no other
//! dispatch on an unresolved incident still holds.
//!
//! Rescue rows are always locked in the same order: the incident, then its
//! dispatches, then personnel by ascending id, then equipment by ascending id.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::equipment::models::EquipmentStatus;
use crate::features::incidents::models::IncidentStatus;

/// Resources referenced by a set of dispatches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchedResources {
    pub personnel_ids: Vec<Uuid>,
    pub equipment_ids: Vec<Uuid>,
}

/// Release/claim pair for one resource slot of a dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reassignment {
    pub release: Option<Uuid>,
    pub claim: Option<Uuid>,
}

/// Work out what a dispatch update does to one slot.
///
/// `requested` is `None` when the update leaves the slot alone.
pub fn plan_reassignment(current: Option<Uuid>, requested: Option<Uuid>) -> Reassignment {
    match requested {
        Some(next) if current != Some(next) => Reassignment {
            release: current,
            claim: Some(next),
        },
        _ => Reassignment::default(),
    }
}

/// Lock an incident and read its status
pub async fn lock_incident(conn: &mut PgConnection, incident_id: Uuid) -> Result<IncidentStatus> {
    sqlx::query_scalar("SELECT status FROM incidents WHERE id = $1 FOR UPDATE")
        .bind(incident_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to lock incident: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Incident '{}' not found", incident_id)))
}

/// Lock personnel and equipment rows by ascending id before claims and releases
pub async fn lock_resources(
    conn: &mut PgConnection,
    personnel_ids: &[Uuid],
    equipment_ids: &[Uuid],
) -> Result<()> {
    if !personnel_ids.is_empty() {
        sqlx::query("SELECT id FROM personnel WHERE id = ANY($1) ORDER BY id FOR UPDATE")
            .bind(personnel_ids)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                tracing::error!("Failed to lock personnel: {:?}", e);
                AppError::Database(e)
            })?;
    }
    if !equipment_ids.is_empty() {
        sqlx::query("SELECT id FROM equipment WHERE id = ANY($1) ORDER BY id FOR UPDATE")
            .bind(equipment_ids)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                tracing::error!("Failed to lock equipment: {:?}", e);
                AppError::Database(e)
            })?;
    }
    Ok(())
}

/// Mark a person as dispatched. Fails with `Conflict` when they are already out.
pub async fn claim_personnel(conn: &mut PgConnection, personnel_id: Uuid) -> Result<()> {
    let available: Option<bool> =
        sqlx::query_scalar("SELECT is_available FROM personnel WHERE id = $1 FOR UPDATE")
            .bind(personnel_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                tracing::error!("Failed to lock personnel: {:?}", e);
                AppError::Database(e)
            })?;

    match available {
        None => Err(AppError::NotFound(format!(
            "Personnel '{}' not found",
            personnel_id
        ))),
        Some(false) => Err(AppError::Conflict(format!(
            "Personnel '{}' is not available",
            personnel_id
        ))),
        Some(true) => {
            sqlx::query(
                "UPDATE personnel SET is_available = FALSE, updated_at = NOW() WHERE id = $1",
            )
            .bind(personnel_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::from_db(e, "Failed to mark personnel unavailable"))?;

            tracing::info!("Personnel claimed for dispatch: id={}", personnel_id);
            Ok(())
        }
    }
}

/// Mark equipment as in use. Only `Available` equipment can be dispatched.
pub async fn claim_equipment(conn: &mut PgConnection, equipment_id: Uuid) -> Result<()> {
    let status: Option<EquipmentStatus> =
        sqlx::query_scalar("SELECT status FROM equipment WHERE id = $1 FOR UPDATE")
            .bind(equipment_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                tracing::error!("Failed to lock equipment: {:?}", e);
                AppError::Database(e)
            })?;

    match status {
        None => Err(AppError::NotFound(format!(
            "Equipment '{}' not found",
            equipment_id
        ))),
        Some(EquipmentStatus::Available) => {
            sqlx::query("UPDATE equipment SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(equipment_id)
                .bind(EquipmentStatus::InUse)
                .execute(&mut *conn)
                .await
                .map_err(|e| AppError::from_db(e, "Failed to mark equipment in use"))?;

            tracing::info!("Equipment claimed for dispatch: id={}", equipment_id);
            Ok(())
        }
        Some(other) => Err(AppError::Conflict(format!(
            "Equipment '{}' is not available (status: {})",
            equipment_id, other
        ))),
    }
}

/// Make a person available again unless another live dispatch still holds them
pub async fn release_personnel(conn: &mut PgConnection, personnel_id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE personnel SET is_available = TRUE, updated_at = NOW()
        WHERE id = $1
          AND is_available = FALSE
          AND NOT EXISTS (
              SELECT 1
              FROM dispatches d
              JOIN incidents i ON i.id = d.incident_id
              WHERE d.personnel_id = $1 AND i.status <> 'resolved'
          )
        "#,
    )
    .bind(personnel_id)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::from_db(e, "Failed to release personnel"))?;

    let released = result.rows_affected() > 0;
    if released {
        tracing::info!("Personnel released: id={}", personnel_id);
    }
    Ok(released)
}

/// Return in-use equipment to `Available` unless another live dispatch still holds it.
///
/// Equipment moved to maintenance or retired meanwhile keeps its status.
pub async fn release_equipment(conn: &mut PgConnection, equipment_id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE equipment SET status = $2, updated_at = NOW()
        WHERE id = $1
          AND status = $3
          AND NOT EXISTS (
              SELECT 1
              FROM dispatches d
              JOIN incidents i ON i.id = d.incident_id
              WHERE d.equipment_id = $1 AND i.status <> 'resolved'
          )
        "#,
    )
    .bind(equipment_id)
    .bind(EquipmentStatus::Available)
    .bind(EquipmentStatus::InUse)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::from_db(e, "Failed to release equipment"))?;

    let released = result.rows_affected() > 0;
    if released {
        tracing::info!("Equipment released: id={}", equipment_id);
    }
    Ok(released)
}

/// Collect the resources currently dispatched to an incident
pub async fn resources_for_incident(
    conn: &mut PgConnection,
    incident_id: Uuid,
) -> Result<DispatchedResources> {
    let rows: Vec<(Option<Uuid>, Option<Uuid>)> = sqlx::query_as(
        "SELECT personnel_id, equipment_id FROM dispatches WHERE incident_id = $1",
    )
    .bind(incident_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to collect dispatched resources: {:?}", e);
        AppError::Database(e)
    })?;

    Ok(collect_resources(rows))
}

fn collect_resources(rows: Vec<(Option<Uuid>, Option<Uuid>)>) -> DispatchedResources {
    let mut resources = DispatchedResources::default();
    for (personnel_id, equipment_id) in rows {
        if let Some(id) = personnel_id {
            if !resources.personnel_ids.contains(&id) {
                resources.personnel_ids.push(id);
            }
        }
        if let Some(id) = equipment_id {
            if !resources.equipment_ids.contains(&id) {
                resources.equipment_ids.push(id);
            }
        }
    }
    resources.personnel_ids.sort();
    resources.equipment_ids.sort();
    resources
}

/// Release every resource in the set
pub async fn release_all(conn: &mut PgConnection, resources: &DispatchedResources) -> Result<()> {
    lock_resources(conn, &resources.personnel_ids, &resources.equipment_ids).await?;
    for id in &resources.personnel_ids {
        release_personnel(conn, *id).await?;
    }
    for id in &resources.equipment_ids {
        release_equipment(conn, *id).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_slot_does_nothing() {
        let current = Some(Uuid::new_v4());
        assert_eq!(plan_reassignment(current, None), Reassignment::default());
        assert_eq!(plan_reassignment(None, None), Reassignment::default());
    }

    #[test]
    fn test_same_resource_does_nothing() {
        let id = Uuid::new_v4();
        assert_eq!(plan_reassignment(Some(id), Some(id)), Reassignment::default());
    }

    #[test]
    fn test_swap_releases_old_and_claims_new() {
        let old = Uuid::new_v4();
        let new = Uuid::new_v4();
        assert_eq!(
            plan_reassignment(Some(old), Some(new)),
            Reassignment {
                release: Some(old),
                claim: Some(new),
            }
        );
    }

    #[test]
    fn test_filling_empty_slot_only_claims() {
        let new = Uuid::new_v4();
        assert_eq!(
            plan_reassignment(None, Some(new)),
            Reassignment {
                release: None,
                claim: Some(new),
            }
        );
    }

    #[test]
    fn test_collect_resources_dedups_and_skips_nulls() {
        let p = Uuid::new_v4();
        let e = Uuid::new_v4();
        let rows = vec![(Some(p), None), (Some(p), Some(e)), (None, Some(e)), (None, None)];
        let resources = collect_resources(rows);
        assert_eq!(resources.personnel_ids, vec![p]);
        assert_eq!(resources.equipment_ids, vec![e]);
    }

    #[test]
    fn test_collect_resources_sorts_ids() {
        let mut ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let rows = ids.iter().rev().map(|id| (Some(*id), Some(*id))).collect();
        let resources = collect_resources(rows);
        ids.sort();
        assert_eq!(resources.personnel_ids, ids);
        assert_eq!(resources.equipment_ids, ids);
    }
}
