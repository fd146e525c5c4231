use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::insights::handlers;
use crate::features::insights::services::InsightService;

/// Create routes for the insights feature
pub fn routes(service: Arc<InsightService>) -> Router {
    Router::new()
        .route("/api/insights", post(handlers::create_insight))
        .route("/api/insights/latest", get(handlers::get_latest_insight))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{lazy_pool, test_server};
    use serde_json::json;

    fn server() -> axum_test::TestServer {
        test_server(routes(Arc::new(InsightService::new(lazy_pool()))))
    }

    #[tokio::test]
    async fn test_create_rejects_blank_summary() {
        let response = server()
            .post("/api/insights")
            .json(&json!({
                "executive_summary": "   ",
                "key_findings": { "peak_hour": 14 }
            }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert!(body["errors"].is_array());
    }

    #[tokio::test]
    async fn test_create_rejects_non_object_findings() {
        let response = server()
            .post("/api/insights")
            .json(&json!({
                "executive_summary": "Busy weekend",
                "key_findings": "lots of callouts"
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_create_requires_key_findings() {
        let response = server()
            .post("/api/insights")
            .json(&json!({ "executive_summary": "Busy weekend" }))
            .await;

        response.assert_status_bad_request();
    }
}
