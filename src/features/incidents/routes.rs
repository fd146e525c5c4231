use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::incidents::handlers;
use crate::features::incidents::services::IncidentService;

/// Create routes for the incidents feature
pub fn routes(service: Arc<IncidentService>) -> Router {
    Router::new()
        .route(
            "/api/incidents",
            get(handlers::list_incidents).post(handlers::create_incident),
        )
        .route(
            "/api/incidents/{id}",
            get(handlers::get_incident)
                .patch(handlers::update_incident)
                .delete(handlers::delete_incident),
        )
        .route(
            "/api/incidents/{id}/status",
            patch(handlers::update_incident_status),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{lazy_pool, test_server};
    use serde_json::json;

    fn server() -> axum_test::TestServer {
        test_server(routes(Arc::new(IncidentService::new(lazy_pool()))))
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_severity() {
        let response = server()
            .post("/api/incidents")
            .json(&json!({
                "incident_type": "Avalanche",
                "severity_level": 9,
                "gps_coordinates": { "latitude": 46.5, "longitude": 8.0 }
            }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], json!(false));
        assert!(body["errors"].is_array());
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_incident_type() {
        let response = server()
            .post("/api/incidents")
            .json(&json!({
                "incident_type": "Earthquake",
                "severity_level": 3,
                "gps_coordinates": { "latitude": 46.5, "longitude": 8.0 }
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_status_update_rejects_unknown_status() {
        let response = server()
            .patch(&format!("/api/incidents/{}/status", uuid::Uuid::new_v4()))
            .json(&json!({ "status": "closed" }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_details_update_refuses_status() {
        let response = server()
            .patch(&format!("/api/incidents/{}", uuid::Uuid::new_v4()))
            .json(&json!({ "severity_level": 2, "status": "resolved" }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert!(body["errors"].is_array());
        assert!(body["message"]
            .as_str()
            .is_some_and(|m| m.contains("/api/incidents/{id}/status")));
    }

    #[tokio::test]
    async fn test_malformed_id_is_rejected() {
        let response = server().get("/api/incidents/not-a-uuid").await;
        response.assert_status_bad_request();
    }
}
