//! Writing mapped errors to a host's response object.
//!
//! The host framework is reached only through [`ResponseSink`], a single
//! combined "set status and write JSON body" operation. Implementations are
//! provided for `http::Response<serde_json::Value>`, for
//! [`HttpResponseSink`] (serialized `http::Response<Vec<u8>>`), and for
//! `Option<ErrorResponse>`, which simply captures the write.
//!
//! # Example
//!
//! ```rust
//! use provider_errors::{respond_with_error, ProviderError};
//! use http::{Response, StatusCode, header};
//! use serde_json::{json, Value};
//!
//! let mut res = Response::new(Value::Null);
//! let err = ProviderError::user(json!({ "code": "quota_exceeded" }));
//!
//! assert!(respond_with_error(&err, &mut res));
//! assert_eq!(res.status(), StatusCode::BAD_REQUEST);
//! assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
//! assert_eq!(res.body(), &json!({ "code": "quota_exceeded" }));
//! ```

use crate::response::{error_to_response, ErrorResponse};
use http::header::{self, HeaderValue};
use http::{Response, StatusCode};
use serde_json::Value;
use std::error::Error;

/// Capability to emit a status code and JSON body to the original caller.
///
/// Request-scoped; the emitter borrows it for a single call and never
/// retains it.
pub trait ResponseSink {
    /// Set the response status and write `body` as JSON.
    fn send_json(&mut self, code: StatusCode, body: Value);
}

impl<S: ResponseSink + ?Sized> ResponseSink for &mut S {
    #[inline]
    fn send_json(&mut self, code: StatusCode, body: Value) {
        (**self).send_json(code, body);
    }
}

impl ResponseSink for Option<ErrorResponse> {
    #[inline]
    fn send_json(&mut self, code: StatusCode, body: Value) {
        *self = Some(ErrorResponse::new(code, body));
    }
}

impl ResponseSink for Response<Value> {
    fn send_json(&mut self, code: StatusCode, body: Value) {
        *self.status_mut() = code;
        self.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        *self.body_mut() = body;
    }
}

/// Host adapter producing a wire-ready `http::Response<Vec<u8>>`.
///
/// The body is serialized when written. Serialization failures are kept
/// and surface from [`into_response`](Self::into_response).
///
/// ```rust
/// use provider_errors::{respond_with_error, HttpResponseSink, ProviderError};
/// use http::{header, StatusCode};
///
/// let mut sink = HttpResponseSink::new();
/// assert!(respond_with_error(&ProviderError::auth(), &mut sink));
///
/// let res = sink.into_response().unwrap().unwrap();
/// assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
/// assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
/// ```
#[derive(Debug, Default)]
pub struct HttpResponseSink {
    response: Option<serde_json::Result<Response<Vec<u8>>>>,
}

impl HttpResponseSink {
    /// Create a sink with nothing written.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a response has been written.
    #[inline]
    pub fn is_written(&self) -> bool {
        self.response.is_some()
    }

    /// Take the written response.
    ///
    /// `Ok(None)` if nothing was written.
    ///
    /// # Errors
    ///
    /// Returns the serialization error if the body could not be encoded.
    pub fn into_response(self) -> serde_json::Result<Option<Response<Vec<u8>>>> {
        self.response.transpose()
    }
}

impl ResponseSink for HttpResponseSink {
    fn send_json(&mut self, code: StatusCode, body: Value) {
        let encoded = ErrorResponse::new(code, body).body_bytes().map(|bytes| {
            let mut res = Response::new(bytes);
            *res.status_mut() = code;
            res.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            res
        });
        self.response = Some(encoded);
    }
}

impl From<ErrorResponse> for Response<Value> {
    fn from(response: ErrorResponse) -> Self {
        let mut res = Response::new(Value::Null);
        res.send_json(response.code, response.body);
        res
    }
}

/// Write the response for `err` to `sink` if it is a recognized error.
///
/// Returns `true` after exactly one write. Returns `false` without touching
/// the sink when the error has no mapping; the caller must then handle it
/// some other way (typically a generic 500 handler). Calling this twice for
/// the same error writes twice.
pub fn respond_with_error<S>(err: &(dyn Error + 'static), sink: &mut S) -> bool
where
    S: ResponseSink + ?Sized,
{
    match error_to_response(err) {
        Some(response) => {
            sink.send_json(response.code, response.body);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderError;
    use serde_json::json;
    use std::io;

    #[derive(Default)]
    struct CountingSink {
        writes: Vec<(StatusCode, Value)>,
    }

    impl ResponseSink for CountingSink {
        fn send_json(&mut self, code: StatusCode, body: Value) {
            self.writes.push((code, body));
        }
    }

    #[test]
    fn handled_error_writes_once() {
        let mut sink = CountingSink::default();
        let err = ProviderError::api("rate limited", StatusCode::SERVICE_UNAVAILABLE);

        assert!(respond_with_error(&err, &mut sink));
        assert_eq!(sink.writes.len(), 1);
        assert_eq!(sink.writes[0].0, StatusCode::BAD_GATEWAY);
        assert_eq!(sink.writes[0].1, json!({ "message": "HTTP 503: rate limited" }));
    }

    #[test]
    fn unhandled_error_writes_nothing() {
        let mut sink = CountingSink::default();
        let err = io::Error::other("null reference");

        assert!(!respond_with_error(&err, &mut sink));
        assert!(sink.writes.is_empty());
    }

    #[test]
    fn low_status_api_error_writes_nothing() {
        let mut sink = CountingSink::default();
        let err = ProviderError::api("moved", StatusCode::MOVED_PERMANENTLY);

        assert!(!respond_with_error(&err, &mut sink));
        assert!(sink.writes.is_empty());
    }

    #[test]
    fn reinvocation_writes_again() {
        let mut sink = CountingSink::default();
        let err = ProviderError::auth();

        assert!(respond_with_error(&err, &mut sink));
        assert!(respond_with_error(&err, &mut sink));
        assert_eq!(sink.writes.len(), 2);
    }

    #[test]
    fn capture_sink() {
        let mut captured: Option<ErrorResponse> = None;
        assert!(respond_with_error(&ProviderError::auth(), &mut captured));

        let response = captured.unwrap();
        assert_eq!(response.code, StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.body,
            json!({ "message": "HTTP 401: invalid access token detected by Provider" })
        );
    }

    #[test]
    fn dyn_sink() {
        let mut captured: Option<ErrorResponse> = None;
        let sink: &mut dyn ResponseSink = &mut captured;
        let err = ProviderError::api("teapot", StatusCode::IM_A_TEAPOT);

        assert!(respond_with_error(&err, sink));
        assert_eq!(captured.unwrap().code, StatusCode::FAILED_DEPENDENCY);
    }

    #[test]
    fn http_response_sink_untouched_when_unhandled() {
        let mut res = Response::new(Value::Null);
        assert!(!respond_with_error(&io::Error::other("x"), &mut res));
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get(header::CONTENT_TYPE).is_none());
        assert_eq!(res.body(), &Value::Null);
    }

    #[test]
    fn byte_sink_serializes_body() {
        let mut sink = HttpResponseSink::new();
        let err = ProviderError::api("bad request", StatusCode::UNPROCESSABLE_ENTITY);

        assert!(respond_with_error(&err, &mut sink));
        assert!(sink.is_written());

        let res = sink.into_response().unwrap().unwrap();
        assert_eq!(res.status(), StatusCode::FAILED_DEPENDENCY);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(res.body().as_slice(), br#"{"message":"HTTP 422: bad request"}"#);
    }

    #[test]
    fn byte_sink_passes_user_payload() {
        let mut sink = HttpResponseSink::new();
        let err = ProviderError::user(json!({ "code": "quota_exceeded" }));

        assert!(respond_with_error(&err, &mut sink));
        let res = sink.into_response().unwrap().unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.body().as_slice(), br#"{"code":"quota_exceeded"}"#);
    }

    #[test]
    fn byte_sink_empty_when_unhandled() {
        let mut sink = HttpResponseSink::new();

        assert!(!respond_with_error(&io::Error::other("x"), &mut sink));
        assert!(!sink.is_written());
        assert!(sink.into_response().unwrap().is_none());
    }

    #[test]
    fn error_response_into_http() {
        let res: Response<Value> = ErrorResponse::message(StatusCode::BAD_GATEWAY, "down").into();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(res.body(), &json!({ "message": "down" }));
    }
}
