//! Conversion of errors into HTTP JSON responses.
//!
//! [`error_to_response`] accepts any error value. Only [`ProviderError`]s
//! are recognized; everything else yields `None` and is left to the
//! caller's generic error handler.
//!
//! Classification is a single match, so `Auth` can never fall into the
//! `424` branch even though its status (401) is a client error.

use crate::codes::{self, StatusClass};
use crate::ProviderError;
use http::StatusCode;
use serde_json::{json, Value};
use std::error::Error;

/// Status code and JSON body to send for a recognized error.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    /// HTTP status for the gateway's own response.
    pub code: StatusCode,
    /// JSON body.
    pub body: Value,
}

impl ErrorResponse {
    /// Create a response from a status and an arbitrary body.
    #[inline]
    pub fn new(code: StatusCode, body: Value) -> Self {
        Self { code, body }
    }

    /// Create a `{"message": ...}` response.
    #[inline]
    pub fn message(code: StatusCode, message: &str) -> Self {
        Self::new(code, json!({ "message": message }))
    }

    /// Serialize the body for the wire.
    #[inline]
    pub fn body_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.body)
    }
}

impl ProviderError {
    /// Map this error to a response, if it has one.
    ///
    /// `Api` errors with an upstream status below 400 return `None`.
    pub fn to_response(&self) -> Option<ErrorResponse> {
        match self {
            Self::Auth => Some(ErrorResponse::message(codes::AUTH_FAILED, self.message())),
            Self::Api { message, status } => StatusClass::of(*status)
                .gateway_status()
                .map(|code| ErrorResponse::message(code, message.as_str())),
            Self::User { json } => Some(ErrorResponse::new(codes::USER_FAILED, json.clone())),
        }
    }

    /// Status [`to_response`](Self::to_response) would answer with, without
    /// building the body.
    pub fn response_code(&self) -> Option<StatusCode> {
        match self {
            Self::Auth => Some(codes::AUTH_FAILED),
            Self::Api { status, .. } => StatusClass::of(*status).gateway_status(),
            Self::User { .. } => Some(codes::USER_FAILED),
        }
    }

    /// Consuming form of [`to_response`](Self::to_response).
    ///
    /// Moves a `User` payload into the response instead of cloning it.
    pub fn into_response(self) -> Option<ErrorResponse> {
        match self {
            Self::User { json } => Some(ErrorResponse::new(codes::USER_FAILED, json)),
            other => other.to_response(),
        }
    }
}

/// Convert an arbitrary error into a response if it is a [`ProviderError`].
///
/// The error itself is inspected, not its `source()` chain.
///
/// ```rust
/// use provider_errors::{error_to_response, ProviderError};
/// use std::io;
///
/// let generic = io::Error::other("connection reset");
/// assert!(error_to_response(&generic).is_none());
///
/// let auth = ProviderError::auth();
/// assert_eq!(error_to_response(&auth).unwrap().code.as_u16(), 401);
/// ```
pub fn error_to_response(err: &(dyn Error + 'static)) -> Option<ErrorResponse> {
    err.downcast_ref::<ProviderError>()
        .and_then(ProviderError::to_response)
}
