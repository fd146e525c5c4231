use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::maintenance_logs::handlers;
use crate::features::maintenance_logs::services::MaintenanceLogService;

/// Create routes for the maintenance logs feature
pub fn routes(service: Arc<MaintenanceLogService>) -> Router {
    Router::new()
        .route(
            "/api/maintenance-logs",
            get(handlers::list_maintenance_logs).post(handlers::create_maintenance_log),
        )
        .route(
            "/api/maintenance-logs/{id}",
            get(handlers::get_maintenance_log)
                .patch(handlers::update_maintenance_log)
                .delete(handlers::delete_maintenance_log),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{lazy_pool, test_server};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_rejects_blank_issue_type() {
        let server = test_server(routes(Arc::new(MaintenanceLogService::new(lazy_pool()))));

        let response = server
            .post("/api/maintenance-logs")
            .json(&json!({
                "equipment_id": uuid::Uuid::new_v4(),
                "issue_type": "",
                "description": "Strap frayed"
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_list_rejects_malformed_equipment_filter() {
        let server = test_server(routes(Arc::new(MaintenanceLogService::new(lazy_pool()))));

        let response = server
            .get("/api/maintenance-logs")
            .add_query_param("equipment_id", "sled-7")
            .await;

        response.assert_status_bad_request();
    }
}
