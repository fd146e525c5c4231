mod maintenance_log_handler;

pub use maintenance_log_handler::*;
