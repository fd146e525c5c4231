mod transaction_dto;

pub use transaction_dto::*;
