use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::returns::handlers;
use crate::features::returns::services::ReturnService;

/// Create routes for the returns feature
pub fn routes(service: Arc<ReturnService>) -> Router {
    Router::new()
        .route(
            "/api/returns",
            get(handlers::list_returns).post(handlers::create_return),
        )
        .route("/api/returns/timeline", get(handlers::list_return_timeline))
        .route(
            "/api/returns/{id}",
            get(handlers::get_return)
                .patch(handlers::update_return)
                .delete(handlers::delete_return),
        )
        .route("/api/orders/{id}/return", get(handlers::get_order_return))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{lazy_pool, test_server};
    use serde_json::json;

    fn server() -> axum_test::TestServer {
        test_server(routes(Arc::new(ReturnService::new(lazy_pool()))))
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_reason() {
        let response = server()
            .post("/api/returns")
            .json(&json!({
                "order_id": uuid::Uuid::new_v4(),
                "reason": "Changed my mind"
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_create_rejects_oversized_description() {
        let response = server()
            .post("/api/returns")
            .json(&json!({
                "order_id": uuid::Uuid::new_v4(),
                "reason": "Faulty product",
                "description": "x".repeat(5001)
            }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert!(body["errors"].is_array());
    }
}
