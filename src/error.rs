//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every core operation returns either a success value or exactly one `AppError` kind;
//! the transport layer turns the kind into a status code and a JSON body.
//!
//! The text a client sees is taken from an explicit table (`AppError::public_message`)
//! rather than from the wrapped error. Login and authentication failures always produce
//! the same message regardless of cause, and internal failures are logged server-side
//! and answered with a generic message.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::gate::AuthRejection;
use crate::auth::token::TokenError;
use crate::store::StoreError;

const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";
const UNAUTHENTICATED_MESSAGE: &str = "Invalid or missing authentication token";
const FORBIDDEN_MESSAGE: &str = "You do not have access to this resource";
const DUPLICATE_IDENTITY_MESSAGE: &str = "Username or email already registered";
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// The request body could not be parsed at all (HTTP 400).
    BadRequest(String),
    /// Input parsed but failed validation rules (HTTP 422).
    ValidationError(String),
    /// Username or email is already taken (HTTP 409).
    DuplicateIdentity,
    /// Login failed. Deliberately silent about whether the user exists (HTTP 401).
    InvalidCredentials,
    /// Missing, malformed, invalid or expired token (HTTP 401).
    Unauthenticated,
    /// The caller does not own the resource (HTTP 403).
    Forbidden,
    /// The requested resource does not exist (HTTP 404).
    NotFound(String),
    /// Hashing, token signing or other failure unrelated to caller input (HTTP 500).
    InternalServerError(String),
    /// Failure reported by the storage backend (HTTP 500).
    DatabaseError(String),
}

impl AppError {
    /// The message exposed to clients for this error kind.
    pub fn public_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::ValidationError(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::DuplicateIdentity => DUPLICATE_IDENTITY_MESSAGE.to_string(),
            AppError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_string(),
            AppError::Unauthenticated => UNAUTHENTICATED_MESSAGE.to_string(),
            AppError::Forbidden => FORBIDDEN_MESSAGE.to_string(),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                INTERNAL_MESSAGE.to_string()
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::DuplicateIdentity => write!(f, "Duplicate identity"),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::Unauthenticated => write!(f, "Unauthenticated"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DuplicateIdentity => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::InternalServerError(_) | AppError::DatabaseError(_) = self {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.public_message()
        }))
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Password hashing failed: {}", error))
    }
}

/// Uniqueness violations become `DuplicateIdentity`; everything else is a server error.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::Duplicate => AppError::DuplicateIdentity,
            StoreError::Database(e) => AppError::DatabaseError(e.to_string()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> AppError {
        AppError::Unauthenticated
    }
}

impl From<AuthRejection> for AppError {
    fn from(_: AuthRejection) -> AppError {
        AppError::Unauthenticated
    }
}
