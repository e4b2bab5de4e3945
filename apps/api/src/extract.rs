//! Extractors whose rejections use the JSON error envelope.
//!
//! Plain `Json` / `Query` answer malformed input with a text body; these
//! wrappers turn the rejection into an [`ApiError`] of kind `validation`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
