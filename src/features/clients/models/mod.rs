mod client;

pub use client::{Client, MonthlySpending};
