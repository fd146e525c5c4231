mod mission_report;

pub use mission_report::MissionReportWithContext;
