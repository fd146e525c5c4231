pub mod clients;
pub mod dashboard;
pub mod dispatches;
pub mod equipment;
pub mod incidents;
pub mod insights;
pub mod maintenance_logs;
pub mod mission_reports;
pub mod orders;
pub mod personnel;
pub mod products;
pub mod returns;
pub mod transactions;
