mod core;
mod features;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::clients::{routes as clients_routes, ClientService};
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::dispatches::{routes as dispatches_routes, DispatchService};
use crate::features::equipment::{routes as equipment_routes, EquipmentService};
use crate::features::incidents::{routes as incidents_routes, IncidentService};
use crate::features::insights::{routes as insights_routes, InsightService};
use crate::features::maintenance_logs::{routes as maintenance_routes, MaintenanceLogService};
use crate::features::mission_reports::{routes as mission_reports_routes, MissionReportService};
use crate::features::orders::{routes as orders_routes, OrderService};
use crate::features::personnel::{routes as personnel_routes, PersonnelService};
use crate::features::products::{routes as products_routes, ProductService};
use crate::features::returns::{routes as returns_routes, ReturnService};
use crate::features::transactions::{routes as transactions_routes, TransactionService};
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Rescue operations
    let incident_service = Arc::new(IncidentService::new(pool.clone()));
    let personnel_service = Arc::new(PersonnelService::new(pool.clone()));
    let equipment_service = Arc::new(EquipmentService::new(pool.clone()));
    let dispatch_service = Arc::new(DispatchService::new(pool.clone()));
    let maintenance_log_service = Arc::new(MaintenanceLogService::new(pool.clone()));
    let mission_report_service = Arc::new(MissionReportService::new(pool.clone()));
    tracing::info!("Rescue operation services initialized");

    // Retail back office
    let client_service = Arc::new(ClientService::new(pool.clone()));
    let product_service = Arc::new(ProductService::new(pool.clone()));
    let transaction_service = Arc::new(TransactionService::new(pool.clone()));
    let order_service = Arc::new(OrderService::new(pool.clone()));
    let return_service = Arc::new(ReturnService::new(pool.clone()));
    tracing::info!("Retail services initialized");

    let dashboard_service = Arc::new(DashboardService::new(pool.clone()));
    let insight_service = Arc::new(InsightService::new(pool.clone()));
    tracing::info!("Dashboard and insight services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let api_routes = Router::new()
        .merge(incidents_routes::routes(incident_service))
        .merge(personnel_routes::routes(personnel_service))
        .merge(equipment_routes::routes(equipment_service))
        .merge(dispatches_routes::routes(dispatch_service))
        .merge(maintenance_routes::routes(maintenance_log_service))
        .merge(mission_reports_routes::routes(mission_report_service))
        .merge(clients_routes::routes(client_service))
        .merge(products_routes::routes(product_service))
        .merge(transactions_routes::routes(transaction_service))
        .merge(orders_routes::routes(order_service))
        .merge(returns_routes::routes(return_service))
        .merge(dashboard_routes::routes(dashboard_service))
        .merge(insights_routes::routes(insight_service));

    let app = Router::new()
        .merge(swagger)
        .merge(api_routes)
        .merge(health_route)
        .layer(RequestBodyLimitLayer::new(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
