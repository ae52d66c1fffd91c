//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the single error type returned by the services,
//! stores and HTTP handlers of the server. Business logic returns `Result<_, AppError>`
//! and the `ResponseError` implementation below is the one place where an error is
//! turned into an HTTP status and a JSON body of the form `{"error": "..."}`.
//!
//! Store and internal failures are logged here and answered with a generic message so
//! that SQL text or driver details never reach the client.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Missing, malformed, wrongly signed or expired credential (HTTP 401).
    /// Also used for a failed login, with the same message whether the username
    /// or the password was wrong.
    Unauthorized(String),
    /// The request body could not be parsed (HTTP 400).
    BadRequest(String),
    /// The resource does not exist or is not owned by the caller (HTTP 404).
    NotFound(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Failure of the underlying store, e.g. lost connectivity (HTTP 500).
    DatabaseError(String),
    /// Well-formed request whose fields fail validation (HTTP 422).
    ValidationError(String),
}

impl AppError {
    /// The generic "invalid credentials" error returned by login and the auth guard.
    pub fn invalid_credentials() -> Self {
        AppError::Unauthorized("Invalid credentials".into())
    }

    pub fn task_not_found() -> Self {
        AppError::NotFound("Task not found".into())
    }

    /// The message sent to the client. Store and internal errors are masked.
    pub fn client_message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => msg,
            AppError::InternalServerError(_) => "Internal server error",
            AppError::DatabaseError(_) => "Database error",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::InternalServerError(detail) | AppError::DatabaseError(detail) => {
                log::error!("{}", detail);
            }
            _ => log::debug!("request failed: {}", self),
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.client_message()
        }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// A unique-constraint violation is a client problem (a duplicate username) and
/// becomes a validation error; everything else is a store failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::ValidationError("Username already exists".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(format!("Migration failed: {}", error))
    }
}

/// Names each failing field with its rule message. Submitted values are never echoed,
/// so a rejected password does not end up in the response or the logs.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let message = fields
            .into_iter()
            .map(|(field, field_errors)| {
                let reasons: Vec<String> = field_errors
                    .iter()
                    .map(|err| match &err.message {
                        Some(message) => message.to_string(),
                        None => format!("invalid {}", err.code),
                    })
                    .collect();
                format!("{}: {}", field, reasons.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");
        AppError::ValidationError(message)
    }
}

/// JWT failures all collapse to the same unauthorized response; the detail is only logged.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("rejected token: {}", error);
        AppError::Unauthorized("Invalid token".into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Password hashing failed: {}", error))
    }
}
