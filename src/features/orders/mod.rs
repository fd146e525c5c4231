//! Order lines of retail transactions.
//!
//! Stock moves with every order change; how many units an order holds is decided
//! by [`models::units_held`].

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::OrderService;
