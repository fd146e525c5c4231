pub mod holdings;
mod order_service;

pub use order_service::{OrderScope, OrderService};
