mod maintenance_log_dto;

pub use maintenance_log_dto::*;
