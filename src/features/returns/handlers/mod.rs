mod return_handler;

pub use return_handler::*;
