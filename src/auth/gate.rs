//! Request-level authentication: turns an `Authorization` header into a user id.
//!
//! Kept free of any transport types so the whole decision can be exercised with plain
//! strings. The actix middleware is a thin wrapper around [`authenticate`].

use thiserror::Error;

use super::token::{TokenError, TokenService};

const BEARER_SCHEME: &str = "Bearer";

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    #[error("authorization header is missing")]
    MissingHeader,
    #[error("authorization header is not of the form 'Bearer <token>'")]
    MalformedHeader,
    #[error("bearer token rejected: {0}")]
    InvalidToken(TokenError),
}

/// Extracts the token from a `Bearer <token>` header value.
///
/// The value must be exactly two space-separated parts with the scheme spelled `Bearer`.
pub fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}

/// Resolves the caller's id from the raw `Authorization` header value.
///
/// Header shape is checked before the token service is consulted.
pub fn authenticate(header: Option<&str>, tokens: &TokenService) -> Result<i64, AuthRejection> {
    let header = header.ok_or(AuthRejection::MissingHeader)?;
    let token = bearer_token(header).ok_or(AuthRejection::MalformedHeader)?;
    tokens.validate(token).map_err(AuthRejection::InvalidToken)
}
