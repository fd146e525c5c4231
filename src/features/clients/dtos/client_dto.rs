use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::clients::models::{Client, MonthlySpending};
use crate::shared::types::{default_page, default_page_size, impl_paginated};
use crate::shared::validation::{validate_not_blank, PHONE_REGEX, POST_CODE_REGEX};

fn validate_birth_date(value: &NaiveDate) -> Result<(), ValidationError> {
    if *value > Utc::now().date_naive() {
        return Err(ValidationError::new("future_birth_date")
            .with_message("Birth date must not be in the future".into()));
    }
    Ok(())
}

/// Postal address of a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddressDto {
    #[validate(
        length(min = 1, max = 255, message = "Address line 1 must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub line1: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "Address line 2 must not exceed 255 characters"))]
    pub line2: String,
    #[validate(regex(path = *POST_CODE_REGEX, message = "Invalid post code"))]
    pub post_code: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub city: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub country: String,
}

/// Request DTO for registering a client
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateClientDto {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: String,
    #[validate(custom(function = "validate_birth_date"))]
    pub birth_date: NaiveDate,
    #[validate(
        length(min = 1, max = 20, message = "Sex must be 1-20 characters"),
        custom(function = "validate_not_blank")
    )]
    pub sex: String,
    #[validate(nested)]
    pub address: AddressDto,
}

/// Request DTO for a partial client update; the address is replaced as a whole
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateClientDto {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,
    #[validate(custom(function = "validate_birth_date"))]
    pub birth_date: Option<NaiveDate>,
    #[validate(
        length(min = 1, max = 20, message = "Sex must be 1-20 characters"),
        custom(function = "validate_not_blank")
    )]
    pub sex: Option<String>,
    #[validate(nested)]
    pub address: Option<AddressDto>,
}

/// Query params for listing clients
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ClientQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// Case-insensitive search in name or email
    pub search: Option<String>,
}

impl_paginated!(ClientQueryParams);

/// Response DTO for a client
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientResponseDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub sex: String,
    pub address: AddressDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Client> for ClientResponseDto {
    fn from(c: Client) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            birth_date: c.birth_date,
            sex: c.sex,
            address: AddressDto {
                line1: c.address_line1,
                line2: c.address_line2,
                post_code: c.post_code,
                city: c.city,
                country: c.country,
            },
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MonthlySpendingDto {
    /// Calendar month, `YYYY-MM`
    pub month: String,
    #[schema(value_type = String, example = "149.90")]
    pub total: Decimal,
}

impl From<MonthlySpending> for MonthlySpendingDto {
    fn from(m: MonthlySpending) -> Self {
        Self {
            month: m.month,
            total: m.total,
        }
    }
}

/// Purchase statistics for the client detail page.
///
/// Cancelled transactions count towards `transaction_count` only.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientStatsDto {
    pub transaction_count: i64,
    #[schema(value_type = String, example = "1249.50")]
    pub total_spent: Decimal,
    #[schema(value_type = String, example = "124.95")]
    pub average_transaction_value: Decimal,
    pub monthly_spending: Vec<MonthlySpendingDto>,
}
