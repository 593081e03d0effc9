//! Upstream status classification and the gateway's response statuses.
//!
//! Provider adapters report whatever status the provider answered with.
//! The gateway never repeats that status to its own client; it classifies
//! it and answers with one of a fixed set of statuses instead.
//!
//! # Classes
//!
//! | Range | Class |
//! |---|---|
//! | 100-199 | Informational |
//! | 200-299 | Success |
//! | 300-399 | Redirection |
//! | 400-499 | ClientError |
//! | 500-999 | ServerError |
//!
//! `http::StatusCode` accepts anything in `100..=999`, so every value at or
//! above 500 counts as a server failure, not only the registered 5xx codes.
//!
//! # Example
//!
//! ```rust
//! use provider_errors::{StatusClass, codes};
//! use http::StatusCode;
//!
//! let class = StatusClass::of(StatusCode::TOO_MANY_REQUESTS);
//! assert_eq!(class, StatusClass::ClientError);
//! assert_eq!(class.gateway_status(), Some(codes::DEPENDENCY_FAILED));
//! ```

use http::status::InvalidStatusCode;
use http::StatusCode;
use std::fmt;

/// Response status for rejected provider credentials.
pub const AUTH_FAILED: StatusCode = StatusCode::UNAUTHORIZED;

/// Response status when the provider itself failed (upstream 5xx).
pub const UPSTREAM_FAILED: StatusCode = StatusCode::BAD_GATEWAY;

/// Response status when the provider refused the request (upstream 4xx).
pub const DEPENDENCY_FAILED: StatusCode = StatusCode::FAILED_DEPENDENCY;

/// Response status for client-facing user payloads.
pub const USER_FAILED: StatusCode = StatusCode::BAD_REQUEST;

/// Validate a raw status reported by a provider.
///
/// # Errors
///
/// Returns `Err` if `code` is outside `100..=999`.
#[inline]
pub fn upstream_status(code: u16) -> Result<StatusCode, InvalidStatusCode> {
    StatusCode::from_u16(code)
}

/// Class of an upstream HTTP status.
///
/// Small `Copy` metadata; derived from the numeric status alone.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum StatusClass {
    /// 100-199.
    Informational,
    /// 200-299.
    Success,
    /// 300-399.
    Redirection,
    /// 400-499: the provider refused the request.
    ClientError,
    /// 500 and above: the provider failed.
    ServerError,
}

impl StatusClass {
    /// Classify a raw status integer.
    ///
    /// Values outside `100..=999` are not valid statuses and never come
    /// from a `StatusCode`; they are clamped to the nearest class, so
    /// `0..=99` is `Informational` and `1000..` is `ServerError`. Use
    /// [`upstream_status`] to reject them instead.
    pub const fn from_code(code: u16) -> Self {
        match code {
            0..=199 => Self::Informational,
            200..=299 => Self::Success,
            300..=399 => Self::Redirection,
            400..=499 => Self::ClientError,
            _ => Self::ServerError,
        }
    }

    /// Classify a status.
    #[inline]
    pub fn of(status: StatusCode) -> Self {
        Self::from_code(status.as_u16())
    }

    /// Status the gateway answers with for a provider failure of this class.
    ///
    /// `None` for classes below 400, which are not provider failures.
    #[inline]
    pub const fn gateway_status(self) -> Option<StatusCode> {
        match self {
            Self::ServerError => Some(UPSTREAM_FAILED),
            Self::ClientError => Some(DEPENDENCY_FAILED),
            Self::Informational | Self::Success | Self::Redirection => None,
        }
    }

    /// Short label for log lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Informational => "informational",
            Self::Success => "success",
            Self::Redirection => "redirection",
            Self::ClientError => "client-error",
            Self::ServerError => "server-error",
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
