use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::personnel::handlers;
use crate::features::personnel::services::PersonnelService;

/// Create routes for the personnel feature
pub fn routes(service: Arc<PersonnelService>) -> Router {
    Router::new()
        .route(
            "/api/personnel",
            get(handlers::list_personnel).post(handlers::create_personnel),
        )
        .route(
            "/api/personnel/by-email/{email}",
            get(handlers::get_personnel_by_email),
        )
        .route(
            "/api/personnel/{id}",
            get(handlers::get_personnel)
                .patch(handlers::update_personnel)
                .delete(handlers::delete_personnel),
        )
        .route("/api/personnel/{id}/stats", get(handlers::get_personnel_stats))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{lazy_pool, test_server};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let server = test_server(routes(Arc::new(PersonnelService::new(lazy_pool()))));

        let response = server
            .post("/api/personnel")
            .json(&json!({
                "name": "Anna Kowalska",
                "email": "anna-at-rescue",
                "phone": "601-234-567",
                "role": "Medic",
                "certifications": ["CPR"],
                "base_station": "Summit Station"
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_create_requires_json_body() {
        let server = test_server(routes(Arc::new(PersonnelService::new(lazy_pool()))));

        let response = server.post("/api/personnel").text("name=Anna").await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], json!(false));
    }
}
