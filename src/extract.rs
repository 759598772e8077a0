use axum::{extract::rejection::JsonRejection, extract::FromRequest};

use crate::error::AppError;

/// `axum::Json` whose rejections become a 400 with the usual `{"error": …}` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}
