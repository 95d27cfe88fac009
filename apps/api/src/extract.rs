//! Request extractors whose rejections surface as `AppError::Validation`, so a body or
//! query that does not fit its schema gets the same error shape as every other failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::AppError;

/// `Json<T>` with the rejection mapped to `VALIDATION_ERROR`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Query<T>` with the rejection mapped to `VALIDATION_ERROR`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
