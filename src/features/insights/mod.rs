//! Insights produced by the external report service.
//!
//! The report service pulls `/api/dashboard/export`, analyses it and posts the
//! result back here. Only the newest insight is served.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/insights/latest` | Most recent insight |
//! | POST | `/api/insights` | Store a new insight |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::InsightService;
