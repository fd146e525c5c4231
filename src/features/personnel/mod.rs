//! Rescue personnel: team members, availability and mission statistics.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/personnel` | List personnel (filter by availability, search) |
//! | POST | `/api/personnel` | Add a team member |
//! | GET | `/api/personnel/by-email/{email}` | Look up by email |
//! | GET | `/api/personnel/{id}` | Get a team member |
//! | PATCH | `/api/personnel/{id}` | Update a team member |
//! | DELETE | `/api/personnel/{id}` | Delete a team member |
//! | GET | `/api/personnel/{id}/stats` | Mission and report statistics |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::PersonnelService;
