use utoipa::{Modify, OpenApi};

use crate::features::clients::{dtos as clients_dtos, handlers as clients_handlers};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::dispatches::{dtos as dispatches_dtos, handlers as dispatches_handlers};
use crate::features::equipment::{dtos as equipment_dtos, handlers as equipment_handlers};
use crate::features::incidents::{dtos as incidents_dtos, handlers as incidents_handlers};
use crate::features::insights::{dtos as insights_dtos, handlers as insights_handlers};
use crate::features::maintenance_logs::{
    dtos as maintenance_dtos, handlers as maintenance_handlers,
};
use crate::features::mission_reports::{
    dtos as mission_reports_dtos, handlers as mission_reports_handlers,
};
use crate::features::orders::{dtos as orders_dtos, handlers as orders_handlers};
use crate::features::personnel::{dtos as personnel_dtos, handlers as personnel_handlers};
use crate::features::products::{dtos as products_dtos, handlers as products_handlers};
use crate::features::returns::{dtos as returns_dtos, handlers as returns_handlers};
use crate::features::transactions::{
    dtos as transactions_dtos, handlers as transactions_handlers,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Incidents
        incidents_handlers::list_incidents,
        incidents_handlers::get_incident,
        incidents_handlers::create_incident,
        incidents_handlers::update_incident,
        incidents_handlers::update_incident_status,
        incidents_handlers::delete_incident,
        // Personnel
        personnel_handlers::list_personnel,
        personnel_handlers::get_personnel,
        personnel_handlers::get_personnel_by_email,
        personnel_handlers::create_personnel,
        personnel_handlers::update_personnel,
        personnel_handlers::delete_personnel,
        personnel_handlers::get_personnel_stats,
        // Equipment
        equipment_handlers::list_equipment,
        equipment_handlers::get_equipment,
        equipment_handlers::create_equipment,
        equipment_handlers::update_equipment,
        equipment_handlers::delete_equipment,
        // Dispatches
        dispatches_handlers::list_dispatches,
        dispatches_handlers::list_incident_dispatches,
        dispatches_handlers::get_dispatch,
        dispatches_handlers::create_dispatch,
        dispatches_handlers::update_dispatch,
        dispatches_handlers::delete_dispatch,
        // Maintenance logs
        maintenance_handlers::list_maintenance_logs,
        maintenance_handlers::get_maintenance_log,
        maintenance_handlers::create_maintenance_log,
        maintenance_handlers::update_maintenance_log,
        maintenance_handlers::delete_maintenance_log,
        // Mission reports
        mission_reports_handlers::list_mission_reports,
        mission_reports_handlers::get_mission_report,
        mission_reports_handlers::create_mission_report,
        mission_reports_handlers::update_mission_report,
        mission_reports_handlers::delete_mission_report,
        // Clients
        clients_handlers::list_clients,
        clients_handlers::get_client,
        clients_handlers::get_client_by_email,
        clients_handlers::get_client_by_name,
        clients_handlers::create_client,
        clients_handlers::update_client,
        clients_handlers::delete_client,
        clients_handlers::get_client_stats,
        // Products
        products_handlers::list_products,
        products_handlers::get_product,
        products_handlers::create_product,
        products_handlers::update_product,
        products_handlers::update_product_stock,
        products_handlers::delete_product,
        // Transactions
        transactions_handlers::list_transactions,
        transactions_handlers::list_client_transactions,
        transactions_handlers::get_transaction,
        transactions_handlers::create_transaction,
        transactions_handlers::update_transaction,
        transactions_handlers::update_transaction_status,
        transactions_handlers::add_transaction_order,
        transactions_handlers::recalculate_transaction,
        transactions_handlers::delete_transaction,
        // Orders
        orders_handlers::list_orders,
        orders_handlers::list_transaction_orders,
        orders_handlers::list_product_orders,
        orders_handlers::get_order,
        orders_handlers::create_order,
        orders_handlers::update_order,
        orders_handlers::delete_order,
        // Returns
        returns_handlers::list_returns,
        returns_handlers::list_return_timeline,
        returns_handlers::get_return,
        returns_handlers::get_order_return,
        returns_handlers::create_return,
        returns_handlers::update_return,
        returns_handlers::delete_return,
        // Dashboard
        dashboard_handlers::get_summary,
        dashboard_handlers::export_operations,
        // Insights
        insights_handlers::get_latest_insight,
        insights_handlers::create_insight,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Incidents
            ApiResponse<Vec<incidents_dtos::IncidentResponseDto>>,
            ApiResponse<incidents_dtos::IncidentResponseDto>,
            // Personnel
            ApiResponse<Vec<personnel_dtos::PersonnelResponseDto>>,
            ApiResponse<personnel_dtos::PersonnelResponseDto>,
            ApiResponse<personnel_dtos::PersonnelStatsDto>,
            // Equipment
            ApiResponse<Vec<equipment_dtos::EquipmentResponseDto>>,
            ApiResponse<equipment_dtos::EquipmentResponseDto>,
            // Dispatches
            ApiResponse<Vec<dispatches_dtos::DispatchResponseDto>>,
            ApiResponse<dispatches_dtos::DispatchResponseDto>,
            // Maintenance logs
            ApiResponse<Vec<maintenance_dtos::MaintenanceLogResponseDto>>,
            ApiResponse<maintenance_dtos::MaintenanceLogResponseDto>,
            // Mission reports
            ApiResponse<Vec<mission_reports_dtos::MissionReportResponseDto>>,
            ApiResponse<mission_reports_dtos::MissionReportResponseDto>,
            // Clients
            ApiResponse<Vec<clients_dtos::ClientResponseDto>>,
            ApiResponse<clients_dtos::ClientResponseDto>,
            ApiResponse<clients_dtos::ClientStatsDto>,
            // Products
            ApiResponse<Vec<products_dtos::ProductResponseDto>>,
            ApiResponse<products_dtos::ProductResponseDto>,
            // Transactions
            ApiResponse<Vec<transactions_dtos::TransactionResponseDto>>,
            ApiResponse<transactions_dtos::TransactionResponseDto>,
            // Orders
            ApiResponse<Vec<orders_dtos::OrderResponseDto>>,
            ApiResponse<orders_dtos::OrderResponseDto>,
            // Returns
            ApiResponse<Vec<returns_dtos::ReturnResponseDto>>,
            ApiResponse<returns_dtos::ReturnResponseDto>,
            ApiResponse<Vec<returns_dtos::ReturnTimelineDto>>,
            // Dashboard
            ApiResponse<dashboard_dtos::DashboardSummaryDto>,
            ApiResponse<dashboard_dtos::OperationsExportDto>,
            // Insights
            ApiResponse<insights_dtos::InsightResponseDto>,
        )
    ),
    tags(
        (name = "incidents", description = "Rescue incidents and their lifecycle"),
        (name = "personnel", description = "Rescue personnel roster"),
        (name = "equipment", description = "Equipment inventory"),
        (name = "dispatches", description = "Assignments of personnel and equipment to incidents"),
        (name = "maintenance-logs", description = "Equipment maintenance history"),
        (name = "mission-reports", description = "Post-mission reports"),
        (name = "clients", description = "Retail clients"),
        (name = "products", description = "Product catalogue and stock"),
        (name = "transactions", description = "Client transactions"),
        (name = "orders", description = "Order lines within transactions"),
        (name = "returns", description = "Order returns"),
        (name = "dashboard", description = "Operations summary and data export"),
        (name = "insights", description = "Insights from the report service"),
    ),
    info(
        title = "Basecamp API",
        version = "0.1.0",
        description = "API documentation for Basecamp",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
