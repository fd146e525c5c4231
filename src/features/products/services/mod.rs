mod product_service;
pub mod stock;

pub use product_service::ProductService;
