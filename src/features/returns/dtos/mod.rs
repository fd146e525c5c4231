mod return_dto;

pub use return_dto::*;
