mod maintenance_log_service;

pub use maintenance_log_service::MaintenanceLogService;
