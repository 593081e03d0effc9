//! End-to-end scenarios: an adapter raises an error, the request handler
//! hands it to `respond_with_error`, the host response carries the result.

use http::{header, Response, StatusCode};
use provider_errors::{api_err, respond_with_error, sanitized, user_err, ProviderError};
use serde_json::{json, Value};
use std::error::Error;
use std::fmt;

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug)]
struct NullReference;

impl fmt::Display for NullReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cannot read properties of null (reading 'id')")
    }
}

impl Error for NullReference {}

/// Stand-in for a request handler: run the adapter, map its failure, and
/// fall back to a generic 500 when the error is not recognized.
fn handle(adapter: impl FnOnce() -> Result<Value, BoxError>) -> (Response<Value>, bool) {
    let mut res = Response::new(Value::Null);
    match adapter() {
        Ok(body) => {
            *res.body_mut() = body;
            (res, true)
        }
        Err(err) => {
            let handled = respond_with_error(err.as_ref(), &mut res);
            if !handled {
                *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            }
            (res, handled)
        }
    }
}

fn wire(res: &Response<Value>) -> String {
    serde_json::to_string(res.body()).unwrap()
}

#[test]
fn expired_token() {
    let (res, handled) = handle(|| Err(ProviderError::auth().into()));

    assert!(handled);
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        wire(&res),
        r#"{"message":"HTTP 401: invalid access token detected by Provider"}"#
    );
}

#[test]
fn provider_rate_limited() {
    let (res, handled) = handle(|| Err(api_err!(StatusCode::SERVICE_UNAVAILABLE, "rate limited").into()));

    assert!(handled);
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(wire(&res), r#"{"message":"HTTP 503: rate limited"}"#);
}

#[test]
fn provider_rejected_request() {
    let (res, handled) = handle(|| Err(ProviderError::api("bad request", StatusCode::UNPROCESSABLE_ENTITY).into()));

    assert!(handled);
    assert_eq!(res.status(), StatusCode::FAILED_DEPENDENCY);
    assert_eq!(wire(&res), r#"{"message":"HTTP 422: bad request"}"#);
}

#[test]
fn quota_exceeded() {
    let (res, handled) = handle(|| Err(user_err!({ "code": "quota_exceeded" }).into()));

    assert!(handled);
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(wire(&res), r#"{"code":"quota_exceeded"}"#);
}

#[test]
fn generic_failure_falls_back() {
    let (res, handled) = handle(|| Err(NullReference.into()));

    assert!(!handled);
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.headers().get(header::CONTENT_TYPE).is_none());
    assert_eq!(res.body(), &Value::Null);
}

#[test]
fn redirect_from_provider_falls_back() {
    let (res, handled) = handle(|| Err(ProviderError::api("see other", StatusCode::SEE_OTHER).into()));

    assert!(!handled);
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn successful_adapter_untouched() {
    let (res, handled) = handle(|| Ok(json!({ "items": [] })));

    assert!(handled);
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.body(), &json!({ "items": [] }));
}

#[test]
fn upstream_text_is_sanitized() {
    let upstream = "folder\r\nX-Injected: 1";
    let (res, _) = handle(|| {
        Err(api_err!(StatusCode::NOT_FOUND, "no such folder: {}", sanitized!(upstream)).into())
    });

    assert_eq!(res.status(), StatusCode::FAILED_DEPENDENCY);
    assert_eq!(
        res.body(),
        &json!({ "message": "HTTP 404: no such folder: folder??X-Injected: 1" })
    );
}
