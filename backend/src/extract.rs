//! Request extractors
//!
//! `ApiJson` behaves like `axum::Json` but turns every body rejection
//! (bad syntax, wrong field types, missing content type) into an
//! `ApiError::BadRequest`, so malformed input is always a 400.

use crate::error::ApiError;
use axum::extract::FromRequest;

/// JSON body extractor with `ApiError` rejections
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
