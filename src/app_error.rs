use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use diesel::result::DatabaseErrorKind;
use serde::Serialize;
use utoipa::ToSchema;

pub type DieselError = diesel::result::Error;

/// Errors returned by every handler. Each variant maps to one HTTP status and
/// is rendered as `{"error": "<message>"}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Unique-constraint violation.
    #[error("{0}")]
    Conflict(String),

    /// Foreign-key violation.
    #[error("{0}")]
    InvalidReference(String),

    /// The store could not be reached.
    #[error("{0}")]
    ServiceUnavailable(String),

    /// Any other store failure. The store's message is passed through.
    #[error("{0}")]
    Database(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        tracing::error!(error = %err, "Failed to obtain a DB connection");
        AppError::ServiceUnavailable("Database connection failed".into())
    }

    /// Replaces the message of a [`AppError::Conflict`], leaving other kinds untouched.
    pub fn on_conflict(self, message: &str) -> Self {
        match self {
            AppError::Conflict(_) => AppError::Conflict(message.into()),
            other => other,
        }
    }

    /// Replaces the message of a [`AppError::InvalidReference`], leaving other kinds untouched.
    pub fn on_invalid_reference(self, message: &str) -> Self {
        match self {
            AppError::InvalidReference(_) => AppError::InvalidReference(message.into()),
            other => other,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::InvalidReference(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) | AppError::Database(_) | AppError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<DieselError> for AppError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => AppError::NotFound("Record not found".into()),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                AppError::Conflict(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                AppError::InvalidReference(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
                AppError::unavailable(info.message())
            }
            other => AppError::Database(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of mutating responses that carry nothing but a confirmation.
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Info(&'static str);

    impl diesel::result::DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn db_error(kind: DatabaseErrorKind, message: &'static str) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info(message)))
    }

    #[test]
    fn unique_violation_is_conflict() {
        let err: AppError = db_error(DatabaseErrorKind::UniqueViolation, "duplicate key").into();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "duplicate key"));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn foreign_key_violation_is_bad_request() {
        let err: AppError =
            db_error(DatabaseErrorKind::ForeignKeyViolation, "violates fk").into();
        let err = err.on_invalid_reference("Invalid prescription_id");
        assert!(matches!(err, AppError::InvalidReference(ref m) if m == "Invalid prescription_id"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_store_errors_pass_message_through() {
        let err: AppError =
            db_error(DatabaseErrorKind::CheckViolation, "value too long").into();
        assert_eq!(err.to_string(), "value too long");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn message_overrides_only_apply_to_their_kind() {
        let err = AppError::Database("boom".into())
            .on_conflict("Email already exists")
            .on_invalid_reference("Invalid appointment_id");
        assert!(matches!(err, AppError::Database(ref m) if m == "boom"));

        let err = AppError::Conflict("dup".into()).on_conflict("Email already exists");
        assert_eq!(err.to_string(), "Email already exists");
    }

    #[test]
    fn unavailable_hides_driver_details() {
        let err = AppError::unavailable("connection refused");
        assert_eq!(err.to_string(), "Database connection failed");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
