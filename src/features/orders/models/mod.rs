mod order;

pub use order::{units_held, Order, OrderHolding};
