//! Extractor wrappers whose rejections render through [`ApiError`], so a bad
//! body or query string answers 422 with the usual `{"detail"}` shape.

use axum::extract::{FromRequest, FromRequestParts};

use crate::presentation::http::error::ApiError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
