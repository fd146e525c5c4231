pub mod personnel_dto;

pub use personnel_dto::*;
