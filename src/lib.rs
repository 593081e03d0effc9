//! # Provider Errors
//!
//! Error taxonomy for gateways that proxy requests to third-party storage
//! and cloud providers, plus the translation of those errors into HTTP JSON
//! responses.
//!
//! ## Design Philosophy
//!
//! 1. **Adapters signal, handlers translate.** Provider adapters raise one of
//!    three error kinds; the request layer turns any of them into a status
//!    code and body without knowing which provider failed.
//! 2. **Upstream statuses are never echoed.** A provider 5xx becomes
//!    `502 Bad Gateway`, a provider 4xx becomes `424 Failed Dependency`, and
//!    rejected credentials become `401 Unauthorized`.
//! 3. **User payloads pass through untouched.** A [`ProviderError::User`]
//!    carries a JSON value authored for the client and is forwarded verbatim
//!    with `400 Bad Request`.
//! 4. **Unrecognized errors are declined, not swallowed.** Anything that is
//!    not a `ProviderError` (or a provider error with a status below 400) has
//!    no mapping; the caller falls back to its own handler.
//!
//! ## Decision Table
//!
//! | Error | Status | Body |
//! |---|---|---|
//! | `Auth` | 401 | `{"message": "HTTP 401: invalid access token detected by Provider"}` |
//! | `Api`, upstream ≥ 500 | 502 | `{"message": "HTTP <upstream>: <message>"}` |
//! | `Api`, upstream 400-499 | 424 | `{"message": "HTTP <upstream>: <message>"}` |
//! | `User(json)` | 400 | `json` |
//! | anything else | - | not handled |
//!
//! ## Quick Start
//!
//! ```rust
//! use provider_errors::{ProviderError, respond_with_error, ErrorResponse};
//! use http::StatusCode;
//!
//! let err = ProviderError::api("rate limited", StatusCode::SERVICE_UNAVAILABLE);
//!
//! let mut captured: Option<ErrorResponse> = None;
//! assert!(respond_with_error(&err, &mut captured));
//!
//! let response = captured.unwrap();
//! assert_eq!(response.code, StatusCode::BAD_GATEWAY);
//! assert_eq!(response.body["message"], "HTTP 503: rate limited");
//! ```
//!
//! ## Features
//!
//! - `trusted_debug`: Render user payloads in log lines (debug builds only)

#![warn(missing_docs)]
#![warn(clippy::all)]

use http::StatusCode;
use http::status::InvalidStatusCode;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::result;
use zeroize::Zeroizing;

pub mod codes;
pub mod convenience;
pub mod emitter;
pub mod logging;
pub mod response;

pub use codes::*;
pub use convenience::*;
pub use emitter::*;
pub use logging::*;
pub use response::*;

#[doc(hidden)]
pub use serde_json as __serde_json;

/// Type alias for Results using our error type.
pub type Result<T> = result::Result<T, ProviderError>;

/// Message carried by every [`ProviderError::Auth`], before status prefixing.
pub const AUTH_ERROR_DETAIL: &str = "invalid access token detected by Provider";

/// Fully formatted message of every [`ProviderError::Auth`].
pub const AUTH_ERROR_MESSAGE: &str = "HTTP 401: invalid access token detected by Provider";

/// Placeholder message of a [`ProviderError::User`].
///
/// Never reaches the client; the JSON payload does.
pub const USER_ERROR_MESSAGE: &str = "User error";

/// Discriminant of a [`ProviderError`].
///
/// Serializes as `"apiError"`, `"userError"` or `"authError"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// The provider API answered with an HTTP error.
    ApiError,
    /// A failure whose client-facing detail is a pre-formed JSON value.
    UserError,
    /// The provider rejected the stored access token.
    AuthError,
}

impl ErrorKind {
    /// Wire name of the discriminant.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApiError => "apiError",
            Self::UserError => "userError",
            Self::AuthError => "authError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure raised by a provider adapter.
///
/// Instances are immutable once built. `Auth` is the credential-rejection
/// specialization of `Api`: it reports status 401 and `is_auth_error()`,
/// but is a separate variant so classification never confuses the two.
///
/// # Memory
///
/// The `Api` message may echo upstream response text. It is held in
/// [`Zeroizing`] so the owned buffer is cleared when the error drops.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "errors should be handled or returned"]
pub enum ProviderError {
    /// The provider API call failed with an HTTP error status.
    Api {
        /// `"HTTP {status}: {original message}"`.
        message: Zeroizing<String>,
        /// Status returned by the provider.
        status: StatusCode,
    },
    /// A failure whose detail is shown to the end user verbatim.
    User {
        /// Opaque client-facing payload, forwarded unmodified.
        json: Value,
    },
    /// The provider rejected the stored access token.
    Auth,
}

impl ProviderError {
    /// Create an error for a failed provider API call.
    ///
    /// The stored message embeds the status so logs show it without
    /// consulting the status field:
    ///
    /// ```rust
    /// # use provider_errors::ProviderError;
    /// # use http::StatusCode;
    /// let err = ProviderError::api("bad request", StatusCode::UNPROCESSABLE_ENTITY);
    /// assert_eq!(err.message(), "HTTP 422: bad request");
    /// ```
    pub fn api(message: impl fmt::Display, status: StatusCode) -> Self {
        Self::Api {
            message: Zeroizing::new(format!("HTTP {}: {}", status.as_u16(), message)),
            status,
        }
    }

    /// Create an API error from a raw status integer.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `status` is outside `100..=999`.
    pub fn api_from_u16(
        message: impl fmt::Display,
        status: u16,
    ) -> result::Result<Self, InvalidStatusCode> {
        let status = codes::upstream_status(status)?;
        Ok(Self::api(message, status))
    }

    /// Create an error whose JSON payload is returned to the client as-is.
    #[inline]
    pub fn user(json: impl Into<Value>) -> Self {
        Self::User { json: json.into() }
    }

    /// Create the error for a provider rejecting the stored access token.
    #[inline]
    pub const fn auth() -> Self {
        Self::Auth
    }

    /// Get the kind discriminant.
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Api { .. } => ErrorKind::ApiError,
            Self::User { .. } => ErrorKind::UserError,
            Self::Auth => ErrorKind::AuthError,
        }
    }

    /// Get the error's name, as reported in diagnostics.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Api { .. } => "ProviderApiError",
            Self::User { .. } => "ProviderUserError",
            Self::Auth => "AuthError",
        }
    }

    /// Get the diagnostic message.
    ///
    /// For `User` this is a fixed placeholder that never reaches the client.
    #[inline]
    pub fn message(&self) -> &str {
        match self {
            Self::Api { message, .. } => message.as_str(),
            Self::User { .. } => USER_ERROR_MESSAGE,
            Self::Auth => AUTH_ERROR_MESSAGE,
        }
    }

    /// Get the provider status. `User` errors have none.
    #[inline]
    pub const fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::User { .. } => None,
            Self::Auth => Some(StatusCode::UNAUTHORIZED),
        }
    }

    /// Check whether the provider rejected the stored credentials.
    #[inline]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Auth)
    }

    /// Get the client-facing payload of a `User` error.
    #[inline]
    pub const fn json(&self) -> Option<&Value> {
        match self {
            Self::User { json } => Some(json),
            _ => None,
        }
    }

    /// Create structured internal log entry with explicit lifetime.
    ///
    /// The entry borrows from `self` and cannot outlive the error.
    ///
    /// ```rust
    /// # use provider_errors::ProviderError;
    /// let err = ProviderError::auth();
    /// let log = err.internal_log().with_field("provider", "dropbox");
    /// let mut line = String::new();
    /// log.write_to(&mut line).unwrap();
    /// assert!(line.starts_with("[authError]"));
    /// ```
    #[inline]
    pub fn internal_log(&self) -> InternalLog<'_> {
        InternalLog::new(self)
    }

    /// Callback-style access to the internal log entry.
    #[inline]
    pub fn with_internal_log<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&InternalLog<'_>) -> R,
    {
        let log = self.internal_log();
        f(&log)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for ProviderError {}
