//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the single error type returned by every handler.
//! Each variant maps onto exactly one HTTP status so that callers can tell validation
//! failures, authentication failures, authorization failures and missing resources apart.
//!
//! Two collapses are intentional: "unknown user" and "wrong password" both surface as the
//! same `Unauthorized` message, and "not found" and "owned by someone else" both surface as
//! the same `NotFound` message.
//!
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, `bcrypt::BcryptError` and
//! `actix_web::error::BlockingError` allow the `?` operator inside handlers.

use actix_web::{
    error::{BlockingError, ResponseError},
    http::{header, StatusCode},
    HttpResponse,
};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Missing, invalid or expired credentials (HTTP 401).
    Unauthorized(String),
    /// A valid identity that lacks the required role (HTTP 403).
    Forbidden(String),
    /// A malformed request, or a registration that collides with an existing account (HTTP 400).
    BadRequest(String),
    /// The resource does not exist or is not visible to the caller (HTTP 404).
    NotFound(String),
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// An error originating from database operations (HTTP 500).
    DatabaseError(String),
    /// Input that deserialized but failed validation rules (HTTP 422).
    ValidationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            AppError::Unauthorized(msg) => {
                builder
                    .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                    .json(json!({ "error": msg }))
            }
            // Server faults are logged in full but never echoed back to the client.
            AppError::InternalServerError(msg) | AppError::DatabaseError(msg) => {
                log::error!("{}", msg);
                builder.json(json!({ "error": "Internal server error" }))
            }
            AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => builder.json(json!({ "error": msg })),
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound`; everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Token decoding failures never reveal which check failed.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("rejecting token: {}", error);
        AppError::Unauthorized("Could not validate credentials".into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Password hashing failed: {}", error))
    }
}

impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalServerError(format!("Blocking task failed: {}", error))
    }
}
