//! Equipment inventory.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/equipment` | List equipment (filter by status, category) |
//! | POST | `/api/equipment` | Register equipment |
//! | GET | `/api/equipment/{id}` | Get equipment |
//! | PATCH | `/api/equipment/{id}` | Update equipment |
//! | DELETE | `/api/equipment/{id}` | Delete equipment and its maintenance logs |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::EquipmentService;
