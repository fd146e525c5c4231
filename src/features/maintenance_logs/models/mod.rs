mod maintenance_log;

pub use maintenance_log::MaintenanceLogWithEquipment;
