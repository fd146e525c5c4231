use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::equipment::handlers;
use crate::features::equipment::services::EquipmentService;

/// Create routes for the equipment feature
pub fn routes(service: Arc<EquipmentService>) -> Router {
    Router::new()
        .route(
            "/api/equipment",
            get(handlers::list_equipment).post(handlers::create_equipment),
        )
        .route(
            "/api/equipment/{id}",
            get(handlers::get_equipment)
                .patch(handlers::update_equipment)
                .delete(handlers::delete_equipment),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{lazy_pool, test_server};
    use serde_json::json;

    fn server() -> axum_test::TestServer {
        test_server(routes(Arc::new(EquipmentService::new(lazy_pool()))))
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_status() {
        let response = server()
            .post("/api/equipment")
            .json(&json!({
                "name": "Rescue Sled",
                "category": "Transport",
                "status": "Broken",
                "last_inspected": "2026-02-01"
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_create_rejects_blank_category() {
        let response = server()
            .post("/api/equipment")
            .json(&json!({
                "name": "Rescue Sled",
                "category": " ",
                "last_inspected": "2026-02-01"
            }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert!(body["errors"].is_array());
    }

    #[tokio::test]
    async fn test_update_rejects_bad_date() {
        let response = server()
            .patch(&format!("/api/equipment/{}", uuid::Uuid::new_v4()))
            .json(&json!({ "last_inspected": "yesterday" }))
            .await;

        response.assert_status_bad_request();
    }
}
