mod personnel_handler;

pub use personnel_handler::*;
