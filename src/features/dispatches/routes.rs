use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::dispatches::handlers;
use crate::features::dispatches::services::DispatchService;

/// Create routes for the dispatches feature
pub fn routes(service: Arc<DispatchService>) -> Router {
    Router::new()
        .route(
            "/api/dispatches",
            get(handlers::list_dispatches).post(handlers::create_dispatch),
        )
        .route(
            "/api/dispatches/{id}",
            get(handlers::get_dispatch)
                .patch(handlers::update_dispatch)
                .delete(handlers::delete_dispatch),
        )
        .route(
            "/api/incidents/{id}/dispatches",
            get(handlers::list_incident_dispatches),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{lazy_pool, test_server};
    use serde_json::json;

    fn server() -> axum_test::TestServer {
        test_server(routes(Arc::new(DispatchService::new(lazy_pool()))))
    }

    #[tokio::test]
    async fn test_create_without_resources_is_rejected() {
        let response = server()
            .post("/api/dispatches")
            .json(&json!({ "incident_id": uuid::Uuid::new_v4() }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_create_with_malformed_incident_id_is_rejected() {
        let response = server()
            .post("/api/dispatches")
            .json(&json!({
                "incident_id": "incident-1",
                "personnel_id": uuid::Uuid::new_v4()
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_incident_dispatches_rejects_malformed_id() {
        let response = server().get("/api/incidents/not-a-uuid/dispatches").await;

        response.assert_status_bad_request();
    }
}
