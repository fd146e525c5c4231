//! Returns filed against orders.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/returns` | List returns with product names |
//! | POST | `/api/returns` | Register a return (one per order) |
//! | GET | `/api/returns/timeline` | Returns with their transaction dates |
//! | GET | `/api/returns/{id}` | Get a return |
//! | PATCH | `/api/returns/{id}` | Update reason or description |
//! | DELETE | `/api/returns/{id}` | Delete, taking back restocked units |
//! | GET | `/api/orders/{id}/return` | Return of an order |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ReturnService;
