use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::mission_reports::handlers;
use crate::features::mission_reports::services::MissionReportService;

/// Create routes for the mission reports feature
pub fn routes(service: Arc<MissionReportService>) -> Router {
    Router::new()
        .route(
            "/api/mission-reports",
            get(handlers::list_mission_reports).post(handlers::create_mission_report),
        )
        .route(
            "/api/mission-reports/{id}",
            get(handlers::get_mission_report)
                .patch(handlers::update_mission_report)
                .delete(handlers::delete_mission_report),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{lazy_pool, test_server};
    use serde_json::json;

    #[tokio::test]
    async fn test_update_rejects_out_of_range_difficulty() {
        let server = test_server(routes(Arc::new(MissionReportService::new(lazy_pool()))));

        let response = server
            .patch(&format!("/api/mission-reports/{}", uuid::Uuid::new_v4()))
            .json(&json!({ "difficulty_rating": 9 }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert!(body["errors"].is_array());
    }
}
