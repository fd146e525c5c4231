mod mission_report_service;

pub use mission_report_service::MissionReportService;
