//! Post-mission reports filed by personnel against incidents.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::MissionReportService;
