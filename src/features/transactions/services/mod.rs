pub mod totals;
mod transaction_service;

pub use transaction_service::TransactionService;
