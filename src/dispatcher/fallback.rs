//! Default responses for the two dispatch misses.

use http::header::{HeaderValue, ALLOW, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use http::{Method, Request, Response, StatusCode};
use tracing::error;

use crate::handler::Body;

const NOT_FOUND_BODY: &[u8] = b"404 page not found\n";
const METHOD_NOT_ALLOWED_BODY: &[u8] = b"Method Not Allowed\n";

fn plain_text(status: StatusCode, body: &'static [u8]) -> Response<Body> {
    let mut res = Response::new(Body::from_static(body));
    *res.status_mut() = status;
    let headers = res.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    res
}

/// Generic `404 Not Found` response.
#[must_use]
pub fn not_found() -> Response<Body> {
    plain_text(StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

/// Generic `405 Method Not Allowed` response with `Allow` set to `allow` joined by
/// `", "`.
#[must_use]
pub fn method_not_allowed(allow: &[Method]) -> Response<Body> {
    let mut res = plain_text(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_BODY);
    let joined = allow
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    match HeaderValue::from_str(&joined) {
        Ok(value) => {
            res.headers_mut().insert(ALLOW, value);
        }
        Err(e) => {
            // Method tokens are always valid header values; only extension methods
            // built from raw bytes could end up here.
            error!(allow = %joined, error = %e, "Allow header value rejected");
        }
    }
    res
}

pub(crate) fn default_not_found(_req: Request<Body>) -> Response<Body> {
    not_found()
}

pub(crate) fn default_method_not_allowed(_req: Request<Body>, allow: &[Method]) -> Response<Body> {
    method_not_allowed(allow)
}
