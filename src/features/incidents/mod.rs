//! Rescue incidents.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/incidents` | List incidents (filter by status, type) |
//! | POST | `/api/incidents` | Report an incident |
//! | GET | `/api/incidents/{id}` | Get an incident |
//! | PATCH | `/api/incidents/{id}` | Update incident details |
//! | PATCH | `/api/incidents/{id}/status` | Change status (resolving releases resources) |
//! | DELETE | `/api/incidents/{id}` | Delete with dispatches and mission reports |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::IncidentService;
