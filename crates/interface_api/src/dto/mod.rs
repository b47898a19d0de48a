//! Request/response data transfer objects
//!
//! Request bodies deserialize from camelCase JSON and validate before any
//! repository call. Responses reuse the domain models directly, which
//! already serialize in the wire shape; list endpoints wrap them in a
//! `{items, page, limit, total}` envelope.

use serde::Serialize;

pub mod customers;
pub mod charges;
pub mod invoices;
pub mod notifications;

/// Normalized page/limit pagination, shared by the list endpoints
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Normalizes raw query pagination
///
/// Pages are 1-based; the limit is capped at 100 and defaults to 20.
pub fn page_params(page: Option<u32>, limit: Option<u32>) -> PageParams {
    let limit = i64::from(limit.unwrap_or(20).clamp(1, 100));
    let page = i64::from(page.unwrap_or(1).max(1));
    PageParams {
        page,
        limit,
        offset: (page - 1) * limit,
    }
}

/// Envelope for paginated list responses
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub limit: i64,
    /// Unpaged match count
    pub total: i64,
}

impl<T> Paginated<T> {
    /// Wraps one page of items with the pagination that produced it
    pub fn new(items: Vec<T>, params: PageParams, total: i64) -> Self {
        Self {
            items,
            page: params.page,
            limit: params.limit,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let params = page_params(None, None);
        assert_eq!((params.page, params.limit, params.offset), (1, 20, 0));
    }

    #[test]
    fn test_pagination_caps_limit() {
        let params = page_params(Some(3), Some(500));
        assert_eq!((params.limit, params.offset), (100, 200));
    }

    #[test]
    fn test_pagination_clamps_page() {
        let params = page_params(Some(0), Some(10));
        assert_eq!((params.page, params.offset), (1, 0));
    }

    #[test]
    fn test_envelope_wire_shape() {
        let body = Paginated::new(vec![1, 2, 3], page_params(Some(2), Some(3)), 7);
        let json = serde_json::to_value(&body).expect("serializes");

        assert_eq!(
            json,
            serde_json::json!({ "items": [1, 2, 3], "page": 2, "limit": 3, "total": 7 })
        );
    }
}
