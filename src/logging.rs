//! Structured log entry for provider failures.
//!
//! The crate never logs on its own. Hosts that want a record of a provider
//! failure ask the error for an [`InternalLog`] and hand it to whatever
//! logger they run.
//!
//! - Borrows from the `ProviderError` with an explicit lifetime
//! - Cannot outlive the error that created it
//! - No heap allocations in accessors
//! - Free-text fields are truncated when written (DoS prevention)
//!
//! The user payload of a `User` error is never written by
//! [`InternalLog::write_to`]; it is client data, not diagnostics.

use crate::{ErrorKind, ProviderError};
use http::StatusCode;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;

/// Maximum length for any individual field in formatted output (DoS prevention)
const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Truncation indicator appended to truncated strings
const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Structured log entry with borrowed data from a `ProviderError`.
///
/// # Example
///
/// ```rust
/// # use provider_errors::ProviderError;
/// # use http::StatusCode;
/// let err = ProviderError::api("rate limited", StatusCode::TOO_MANY_REQUESTS);
/// let log = err
///     .internal_log()
///     .with_field("provider", "drive")
///     .with_field("request_id", String::from("r-17"));
///
/// let mut line = String::new();
/// log.write_to(&mut line).unwrap();
/// assert_eq!(
///     line,
///     "[apiError] upstream=429 response=424 message='HTTP 429: rate limited' \
///      provider='drive' request_id='r-17'"
/// );
/// ```
#[derive(Debug)]
pub struct InternalLog<'a> {
    error: &'a ProviderError,
    response_code: Option<StatusCode>,
    fields: SmallVec<[(&'static str, Cow<'a, str>); 4]>,
}

impl<'a> InternalLog<'a> {
    pub(crate) fn new(error: &'a ProviderError) -> Self {
        Self {
            error,
            response_code: error.response_code(),
            fields: SmallVec::new(),
        }
    }

    /// Attach a caller field (provider name, request id, ...).
    #[inline]
    pub fn with_field(mut self, key: &'static str, value: impl Into<Cow<'a, str>>) -> Self {
        self.fields.push((key, value.into()));
        self
    }

    /// Kind of the logged error.
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// Diagnostic message, untruncated.
    #[inline]
    pub fn message(&self) -> &str {
        self.error.message()
    }

    /// Status reported by the provider, if any.
    #[inline]
    pub const fn upstream_status(&self) -> Option<StatusCode> {
        self.error.status_code()
    }

    /// Status the gateway responds with, or `None` if the error is unhandled.
    #[inline]
    pub const fn response_code(&self) -> Option<StatusCode> {
        self.response_code
    }

    /// Caller fields in insertion order.
    #[inline]
    pub fn fields(&self) -> &[(&'static str, Cow<'a, str>)] {
        &self.fields
    }

    /// Write the entry as a single line without intermediate buffers.
    ///
    /// Format:
    /// `[<kind>] upstream=<code|-> response=<code|unhandled> message='<msg>' key='value' ...`
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(f, "[{}] upstream=", self.kind())?;
        match self.upstream_status() {
            Some(status) => write!(f, "{}", status.as_u16())?,
            None => f.write_char('-')?,
        }

        f.write_str(" response=")?;
        match self.response_code {
            Some(code) => write!(f, "{}", code.as_u16())?,
            None => f.write_str("unhandled")?,
        }

        write!(f, " message='{}'", truncate_with_indicator(self.message()))?;

        for (key, value) in &self.fields {
            write!(f, " {}='{}'", key, truncate_with_indicator(value))?;
        }

        Ok(())
    }

    /// Format including the user payload, for trusted debug contexts only.
    ///
    /// Only available with BOTH the `trusted_debug` feature AND debug
    /// assertions enabled.
    #[cfg(all(feature = "trusted_debug", debug_assertions))]
    pub fn format_for_trusted_debug(&self) -> String {
        let mut output = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut output);

        if let Some(json) = self.error.json() {
            let rendered = json.to_string();
            output.push_str(" payload='");
            output.push_str(&truncate_with_indicator(&rendered));
            output.push('\'');
        }

        output
    }
}

impl fmt::Display for InternalLog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

/// Truncate a string for display to prevent DoS via extremely long messages.
///
/// Returns a Cow<str> to avoid allocation when no truncation is needed.
fn truncate_with_indicator(s: &str) -> Cow<'_, str> {
    if s.len() <= MAX_FIELD_OUTPUT_LEN {
        return Cow::Borrowed(s);
    }

    let max_content_len = MAX_FIELD_OUTPUT_LEN.saturating_sub(TRUNCATION_INDICATOR.len());

    let mut idx = max_content_len;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(TRUNCATION_INDICATOR);
    }

    let mut result = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    result.push_str(&s[..idx]);
    result.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(result)
}
