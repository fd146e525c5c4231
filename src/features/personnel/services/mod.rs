mod personnel_service;

pub use personnel_service::PersonnelService;
