//! Response construction helpers.
//!
//! Handlers produce `http::Response<Full<Bytes>>` directly; these helpers
//! keep the content-type bookkeeping in one place. Success bodies are JSON;
//! the legacy error messages are plain text.

use bytes::Bytes;
use http::{StatusCode, header};
use http_body_util::Full;
use serde::Serialize;

pub type Response = http::Response<Full<Bytes>>;

/// `200 OK` with a JSON body serialized from `value`.
pub fn json<T: Serialize>(value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => with_body(StatusCode::OK, "application/json", body),
        Err(e) => text(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("response serialization failed: {e}"),
        ),
    }
}

/// Plain-text body with the given status.
pub fn text(status: StatusCode, body: impl Into<String>) -> Response {
    with_body(status, "text/plain; charset=utf-8", body.into().into_bytes())
}

/// Status-only response with an empty body.
pub fn status(status: StatusCode) -> Response {
    let mut response = http::Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

fn with_body(status: StatusCode, content_type: &'static str, body: Vec<u8>) -> Response {
    let mut response = http::Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, header::HeaderValue::from_static(content_type));
    response
}
