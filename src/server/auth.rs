//! Caller identity from the bearer token
//!
//! The upstream gateway verifies tokens; here the payload is only decoded to
//! read the `email` claim. No signature check happens in this service.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("token payload is not valid base64url")]
    InvalidEncoding,
    #[error("token payload is not valid JSON")]
    InvalidJson,
    #[error("token has no email claim")]
    MissingEmail,
}

#[derive(Debug, Deserialize)]
struct Claims {
    email: Option<String>,
}

/// Token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: Option<&str>) -> Result<&str, ClaimsError> {
    let token = header
        .and_then(|value| value.trim().strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or_default();
    if token.is_empty() {
        return Err(ClaimsError::MissingToken);
    }
    Ok(token)
}

/// The `email` claim of a token
///
/// Dotted tokens (header.payload.signature) are read from their payload
/// segment; anything else is taken to be the payload itself.
pub fn email_claim(token: &str) -> Result<String, ClaimsError> {
    let payload = match token.split('.').collect::<Vec<_>>().as_slice() {
        [single] => *single,
        [_, payload, ..] => *payload,
        [] => return Err(ClaimsError::MissingToken),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| ClaimsError::InvalidEncoding)?;
    let claims: Claims = serde_json::from_slice(&bytes).map_err(|_| ClaimsError::InvalidJson)?;

    claims
        .email
        .filter(|email| !email.trim().is_empty())
        .ok_or(ClaimsError::MissingEmail)
}

/// Caller email straight from the `Authorization` header value
pub fn caller_email(header: Option<&str>) -> Result<String, ClaimsError> {
    email_claim(bearer_token(header)?)
}
