use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::products::handlers;
use crate::features::products::services::ProductService;

/// Create routes for the products feature
pub fn routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route(
            "/api/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/api/products/{id}",
            get(handlers::get_product)
                .patch(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route(
            "/api/products/{id}/stock",
            patch(handlers::update_product_stock),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{lazy_pool, test_server};
    use serde_json::json;

    fn server() -> axum_test::TestServer {
        test_server(routes(Arc::new(ProductService::new(lazy_pool()))))
    }

    #[tokio::test]
    async fn test_create_rejects_negative_price() {
        let response = server()
            .post("/api/products")
            .json(&json!({ "name": "Ice Axe", "price": "-10.00", "stock": 4 }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_stock_change_requires_integer_amount() {
        let response = server()
            .patch(&format!("/api/products/{}/stock", uuid::Uuid::new_v4()))
            .json(&json!({ "amount_change": "lots" }))
            .await;

        response.assert_status_bad_request();
    }
}
