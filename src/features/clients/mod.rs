//! Retail clients.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/clients` | List clients (search by name or email) |
//! | POST | `/api/clients` | Register a client |
//! | GET | `/api/clients/by-email/{email}` | Look up by email |
//! | GET | `/api/clients/by-name/{name}` | Look up by exact name |
//! | GET | `/api/clients/{id}` | Get a client |
//! | PATCH | `/api/clients/{id}` | Update a client |
//! | DELETE | `/api/clients/{id}` | Delete a client without transactions |
//! | GET | `/api/clients/{id}/stats` | Purchase statistics |
//!
//! A client's transactions are listed by the transactions feature at
//! `/api/clients/{id}/transactions`.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ClientService;
