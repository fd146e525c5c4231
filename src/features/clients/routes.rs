use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::clients::handlers;
use crate::features::clients::services::ClientService;

/// Create routes for the clients feature
pub fn routes(service: Arc<ClientService>) -> Router {
    Router::new()
        .route(
            "/api/clients",
            get(handlers::list_clients).post(handlers::create_client),
        )
        .route(
            "/api/clients/by-email/{email}",
            get(handlers::get_client_by_email),
        )
        .route(
            "/api/clients/by-name/{name}",
            get(handlers::get_client_by_name),
        )
        .route(
            "/api/clients/{id}",
            get(handlers::get_client)
                .patch(handlers::update_client)
                .delete(handlers::delete_client),
        )
        .route("/api/clients/{id}/stats", get(handlers::get_client_stats))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{lazy_pool, test_server};
    use serde_json::json;

    fn server() -> axum_test::TestServer {
        test_server(routes(Arc::new(ClientService::new(lazy_pool()))))
    }

    #[tokio::test]
    async fn test_create_rejects_missing_address() {
        let response = server()
            .post("/api/clients")
            .json(&json!({
                "name": "Jan Nowak",
                "email": "jan.nowak@example.com",
                "phone": "601 234 567",
                "birth_date": "1985-04-12",
                "sex": "M"
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_post_code() {
        let response = server()
            .post("/api/clients")
            .json(&json!({
                "name": "Jan Nowak",
                "email": "jan.nowak@example.com",
                "phone": "601 234 567",
                "birth_date": "1985-04-12",
                "sex": "M",
                "address": {
                    "line1": "ul. Zamoyskiego 3",
                    "post_code": "34 -500",
                    "city": "Zakopane",
                    "country": "Poland"
                }
            }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert!(body["errors"].is_array());
    }
}
