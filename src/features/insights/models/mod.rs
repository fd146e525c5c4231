mod insight;

pub use insight::Insight;
