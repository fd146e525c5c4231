//! Dispatches: personnel and equipment assigned to incidents.
//!
//! Creating, changing or deleting a dispatch keeps resource availability in step;
//! see [`services::availability`].

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::DispatchService;
