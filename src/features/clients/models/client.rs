use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a retail client
#[derive(Debug, Clone, FromRow)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub sex: String,
    pub address_line1: String,
    pub address_line2: String,
    pub post_code: String,
    pub city: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Spending of one client in one calendar month (`YYYY-MM`)
#[derive(Debug, Clone, FromRow)]
pub struct MonthlySpending {
    pub month: String,
    pub total: Decimal,
}
