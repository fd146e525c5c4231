//! Product catalogue and stock.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/products` | List products (search by name) |
//! | POST | `/api/products` | Add a product |
//! | GET | `/api/products/{id}` | Get a product |
//! | PATCH | `/api/products/{id}` | Update name, price or image |
//! | PATCH | `/api/products/{id}/stock` | Relative stock change |
//! | DELETE | `/api/products/{id}` | Delete a product no order references |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ProductService;
