use axum::extract::FromRequest;

use crate::app_error::AppError;

/// `Json` extractor whose rejections are rendered as [`AppError::BadRequest`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Treats empty or whitespace-only strings the same as a missing field.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Treats zero or negative identifiers the same as a missing field.
pub fn positive_id(value: Option<i32>) -> Option<i32> {
    value.filter(|v| *v > 0)
}
