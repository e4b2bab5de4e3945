//! Success envelope shared by every endpoint.
//!
//! ```json
//! {
//!   "success": true,
//!   "data": [ ... ],
//!   "total_count": 42,
//!   "limit": 100,
//!   "offset": 0,
//!   "message": "Retrieved 42 materials successfully"
//! }
//! ```
//!
//! Failures use the same `success` flag and are produced by
//! [`ApiError`](crate::error::ApiError).

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use matreg_core::Paged;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Single record (or any non-paged payload) with a message.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            total_count: None,
            limit: None,
            offset: None,
            message: Some(message.into()),
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// One page of a list, mapped item by item into its wire shape.
    ///
    /// The message counts the items on this page, not the total.
    pub fn paged<S, F>(page: Paged<S>, noun: &str, map: F) -> Self
    where
        F: FnMut(S) -> T,
    {
        let items: Vec<T> = page.items.into_iter().map(map).collect();
        let message = format!("Retrieved {} {} successfully", items.len(), noun);

        ApiResponse {
            success: true,
            data: Some(items),
            total_count: Some(page.total_count),
            limit: Some(page.page.limit),
            offset: Some(page.page.offset),
            message: Some(message),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matreg_core::Page;

    #[test]
    fn test_ok_envelope_omits_paging() {
        let body = serde_json::to_value(ApiResponse::ok(7, "done")).unwrap();
        assert_eq!(body, serde_json::json!({ "success": true, "data": 7, "message": "done" }));
    }

    #[test]
    fn test_paged_envelope() {
        let page = Paged {
            items: vec![1, 2],
            total_count: 5,
            page: Page { limit: 2, offset: 2 },
        };
        let body = serde_json::to_value(ApiResponse::paged(page, "things", |n| n * 10)).unwrap();

        assert_eq!(body["data"], serde_json::json!([10, 20]));
        assert_eq!(body["total_count"], 5);
        assert_eq!(body["limit"], 2);
        assert_eq!(body["offset"], 2);
        assert_eq!(body["message"], "Retrieved 2 things successfully");
    }
}
