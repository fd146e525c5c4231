pub mod availability;
mod dispatch_service;

pub use dispatch_service::DispatchService;
