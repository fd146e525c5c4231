use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::orders::handlers;
use crate::features::orders::services::OrderService;

/// Create routes for the orders feature
pub fn routes(service: Arc<OrderService>) -> Router {
    Router::new()
        .route(
            "/api/orders",
            get(handlers::list_orders).post(handlers::create_order),
        )
        .route(
            "/api/orders/{id}",
            get(handlers::get_order)
                .patch(handlers::update_order)
                .delete(handlers::delete_order),
        )
        .route(
            "/api/transactions/{id}/orders",
            get(handlers::list_transaction_orders),
        )
        .route(
            "/api/products/{id}/orders",
            get(handlers::list_product_orders),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{lazy_pool, test_server};
    use serde_json::json;

    fn server() -> axum_test::TestServer {
        test_server(routes(Arc::new(OrderService::new(lazy_pool()))))
    }

    #[tokio::test]
    async fn test_create_rejects_zero_quantity() {
        let response = server()
            .post("/api/orders")
            .json(&json!({
                "transaction_id": uuid::Uuid::new_v4(),
                "product_id": uuid::Uuid::new_v4(),
                "quantity": 0
            }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert!(body["errors"].is_array());
    }

    #[tokio::test]
    async fn test_update_rejects_missing_quantity() {
        let response = server()
            .patch(&format!("/api/orders/{}", uuid::Uuid::new_v4()))
            .json(&json!({}))
            .await;

        response.assert_status_bad_request();
    }
}
