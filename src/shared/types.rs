use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Standard pagination query parameters for list endpoints without extra filters
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

pub fn default_page() -> i64 {
    1
}

pub fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Offset/limit math shared by every list query struct.
///
/// Query structs keep `page`/`page_size` as their own fields rather than
/// flattening `PaginationQuery`, since flattened numbers do not survive
/// urlencoded deserialization.
pub trait Paginated {
    fn page(&self) -> i64;

    fn page_size(&self) -> i64;

    /// Calculate SQL OFFSET from page number, saturating for absurd pages
    fn offset(&self) -> i64 {
        (self.page().max(1) - 1).saturating_mul(self.limit())
    }

    /// Get clamped page_size (respects MAX_PAGE_SIZE)
    fn limit(&self) -> i64 {
        self.page_size().clamp(1, MAX_PAGE_SIZE)
    }
}

/// Implement [`Paginated`] for query structs with `page` and `page_size` fields
macro_rules! impl_paginated {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::shared::types::Paginated for $ty {
                fn page(&self) -> i64 {
                    self.page
                }

                fn page_size(&self) -> i64 {
                    self.page_size
                }
            }
        )+
    };
}

pub(crate) use impl_paginated;

impl_paginated!(PaginationQuery);

/// A page of rows together with the unpaginated row count
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    /// Wrap a page, putting the total into `meta`
    pub fn page(page: Page<T>) -> ApiResponse<Vec<T>> {
        ApiResponse::success(Some(page.items), None, Some(Meta { total: page.total }))
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit() {
        let q = PaginationQuery {
            page: 3,
            page_size: 20,
        };
        assert_eq!(q.offset(), 40);
        assert_eq!(q.limit(), 20);
    }

    #[test]
    fn test_page_size_is_clamped() {
        let q = PaginationQuery {
            page: 1,
            page_size: 10_000,
        };
        assert_eq!(q.limit(), MAX_PAGE_SIZE);

        let q = PaginationQuery {
            page: 1,
            page_size: 0,
        };
        assert_eq!(q.limit(), 1);
    }

    #[test]
    fn test_non_positive_page_is_first_page() {
        let q = PaginationQuery {
            page: -4,
            page_size: 10,
        };
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn test_huge_page_saturates_offset() {
        let q = PaginationQuery {
            page: i64::MAX,
            page_size: 100,
        };
        assert_eq!(q.offset(), i64::MAX);
        assert_eq!(q.limit(), 100);
    }

    #[test]
    fn test_page_response_carries_total() {
        let page = Page {
            items: vec![1, 2, 3],
            total: 42,
        };
        let response = ApiResponse::<i32>::page(page.map(|n| n * 2));
        assert!(response.success);
        assert_eq!(response.data, Some(vec![2, 4, 6]));
        assert_eq!(response.meta.map(|m| m.total), Some(42));
    }
}
