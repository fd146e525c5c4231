use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::transactions::handlers;
use crate::features::transactions::services::TransactionService;

/// Create routes for the transactions feature
pub fn routes(service: Arc<TransactionService>) -> Router {
    Router::new()
        .route(
            "/api/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/api/transactions/{id}",
            get(handlers::get_transaction)
                .put(handlers::update_transaction)
                .delete(handlers::delete_transaction),
        )
        .route(
            "/api/transactions/{id}/status",
            patch(handlers::update_transaction_status),
        )
        .route(
            "/api/transactions/{id}/orders/{order_id}",
            post(handlers::add_transaction_order),
        )
        .route(
            "/api/transactions/{id}/recalculate",
            post(handlers::recalculate_transaction),
        )
        .route(
            "/api/clients/{id}/transactions",
            get(handlers::list_client_transactions),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{lazy_pool, test_server};
    use serde_json::json;

    fn server() -> axum_test::TestServer {
        test_server(routes(Arc::new(TransactionService::new(lazy_pool()))))
    }

    #[tokio::test]
    async fn test_create_rejects_negative_discount() {
        let response = server()
            .post("/api/transactions")
            .json(&json!({
                "client_id": uuid::Uuid::new_v4(),
                "discount": "-5.00"
            }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert!(body["errors"].is_array());
    }

    #[tokio::test]
    async fn test_put_requires_every_field() {
        let response = server()
            .put(&format!("/api/transactions/{}", uuid::Uuid::new_v4()))
            .json(&json!({ "status": "completed" }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_status_rejects_unknown_value() {
        let response = server()
            .patch(&format!("/api/transactions/{}/status", uuid::Uuid::new_v4()))
            .json(&json!({ "status": "refunded" }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_add_order_rejects_malformed_order_id() {
        let response = server()
            .post(&format!("/api/transactions/{}/orders/order-9", uuid::Uuid::new_v4()))
            .await;

        response.assert_status_bad_request();
    }
}
