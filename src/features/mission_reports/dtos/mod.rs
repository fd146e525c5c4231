mod mission_report_dto;

pub use mission_report_dto::*;
