mod return_service;

pub use return_service::ReturnService;
