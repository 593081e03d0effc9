//! Convenience macros for building provider errors.
//!
//! An `Api` error's message reaches the client inside `{"message": ...}`.
//! Upstream text interpolated into it (provider error descriptions, file
//! names) is therefore bounded and stripped of control characters first.
//!
//! # Rules
//!
//! 1. **Format strings MUST be string literals**
//! 2. **Format arguments must be wrapped in `sanitized!()`**
//!
//! ```rust
//! # use provider_errors::{api_err, sanitized};
//! # use http::StatusCode;
//! let upstream = "path/not_found\u{1b}[31m";
//! let err = api_err!(StatusCode::CONFLICT, "lookup failed: {}", sanitized!(upstream));
//! assert_eq!(err.message(), "HTTP 409: lookup failed: path/not_found?");
//! ```
//!
//! ```rust,compile_fail
//! # use provider_errors::api_err;
//! # use http::StatusCode;
//! let raw = "oops";
//! // Args must be wrapped in sanitized!()
//! let err = api_err!(StatusCode::CONFLICT, "{}", raw);
//! ```

use std::fmt;

/// Maximum length in bytes for sanitized values.
pub const MAX_SANITIZED_LEN: usize = 256;

const TRUNCATED_SUFFIX: &str = "...[TRUNCATED]";
const INVALID_INPUT: &str = "[INVALID_INPUT]";

/// Sanitize untrusted text for inclusion in an error message.
///
/// - A CSI escape sequence (`ESC [` ... final byte in `@..=~`) collapses
///   to a single `?`; any other `ESC` becomes `?` on its own
/// - Other control characters become `?`
/// - Output is cut at a UTF-8 boundary to at most [`MAX_SANITIZED_LEN`]
///   bytes, ending in `...[TRUNCATED]` when cut
/// - Input with no printable character becomes `[INVALID_INPUT]`
pub fn sanitize(value: impl fmt::Display) -> String {
    let original = value.to_string();
    let mut out = String::with_capacity(MAX_SANITIZED_LEN.min(original.len()));
    let mut truncated = false;
    let mut saw_printable = false;
    let mut chars = original.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\u{1b}' && chars.next_if_eq(&'[').is_some() {
            // Parameter and intermediate bytes run until the final byte.
            for next in chars.by_ref() {
                if ('@'..='~').contains(&next) {
                    break;
                }
            }
        }

        let replacement = if c.is_control() {
            '?'
        } else {
            saw_printable = true;
            c
        };

        if out.len() + replacement.len_utf8() > MAX_SANITIZED_LEN {
            truncated = true;
            break;
        }
        out.push(replacement);
    }

    if !saw_printable {
        return String::from(INVALID_INPUT);
    }

    if truncated {
        let mut cut = MAX_SANITIZED_LEN - TRUNCATED_SUFFIX.len();
        while !out.is_char_boundary(cut) {
            cut -= 1;
        }
        out.truncate(cut);
        out.push_str(TRUNCATED_SUFFIX);
    }

    out
}

/// Sanitize a value for interpolation into an error message.
///
/// ```rust
/// # use provider_errors::sanitized;
/// let long = "A".repeat(300);
/// let san = sanitized!(long);
/// assert_eq!(san.len(), 256);
/// assert!(san.ends_with("[TRUNCATED]"));
/// ```
#[macro_export]
macro_rules! sanitized {
    ($expr:expr) => {
        $crate::convenience::sanitize(&$expr)
    };
}

/// Create a [`ProviderError::Api`](crate::ProviderError::Api).
///
/// # Arguments
/// - `$status`: `http::StatusCode` returned by the provider
/// - `$msg` / `$fmt`: string literal
/// - `$arg`: optional arguments, each wrapped in `sanitized!()`
///
/// ```rust
/// # use provider_errors::{api_err, sanitized};
/// # use http::StatusCode;
/// let err = api_err!(StatusCode::BAD_GATEWAY, "upstream timed out");
/// assert_eq!(err.message(), "HTTP 502: upstream timed out");
///
/// let id = 42;
/// let err = api_err!(StatusCode::NOT_FOUND, "file {} missing", sanitized!(id));
/// assert_eq!(err.message(), "HTTP 404: file 42 missing");
/// ```
#[macro_export]
macro_rules! api_err {
    ($status:expr, $msg:literal $(,)?) => {
        $crate::ProviderError::api(format!($msg), $status)
    };
    ($status:expr, $fmt:literal $(, sanitized!($arg:expr))+ $(,)?) => {
        $crate::ProviderError::api(format!($fmt $(, $crate::sanitized!($arg))+), $status)
    };
}

/// Create a [`ProviderError::User`](crate::ProviderError::User) from JSON
/// syntax, as accepted by `serde_json::json!`.
///
/// ```rust
/// # use provider_errors::user_err;
/// let err = user_err!({ "code": "quota_exceeded", "limit": 10 });
/// assert_eq!(err.json().unwrap()["limit"], 10);
/// ```
#[macro_export]
macro_rules! user_err {
    ($($json:tt)+) => {
        $crate::ProviderError::user($crate::__serde_json::json!($($json)+))
    };
}
