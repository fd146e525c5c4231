mod dispatch;

pub use dispatch::Dispatch;
