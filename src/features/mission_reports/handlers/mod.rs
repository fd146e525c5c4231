mod mission_report_handler;

pub use mission_report_handler::*;
