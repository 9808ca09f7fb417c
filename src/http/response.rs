//! Response builders
//!
//! Builders for the status codes the server emits. Builder failures are
//! logged and replaced by a bare response rather than propagated.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderValue};
use hyper::{Response, StatusCode};
use serde::Serialize;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Methods advertised on CORS preflight responses
const CORS_METHODS: &str = "GET, HEAD, POST, OPTIONS";

/// Serialize `body` as compact JSON
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(json) => Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(header::CONTENT_LENGTH, json.len())
            .body(Full::new(Bytes::from(json)))
            .unwrap_or_else(|e| {
                log_build_error("JSON", &e);
                Response::new(Full::new(Bytes::new()))
            }),
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            build_500_response()
        }
    }
}

/// `{"message": "..."}` with status 200
pub fn message_response(message: &str) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &serde_json::json!({ "message": message }))
}

/// Plain-text body for probes and error pages
fn text_response(status: StatusCode, text: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::CONTENT_LENGTH, text.len())
        .body(Full::new(Bytes::from_static(text.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from_static(text.as_bytes())))
        })
}

/// Liveness / readiness probe response
pub fn build_health_response() -> Response<Full<Bytes>> {
    text_response(StatusCode::OK, "ok")
}

/// 304 carrying the validators the client should keep
pub fn build_304_response(etag: &str, last_modified: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(header::ETAG, etag)
        .header(header::LAST_MODIFIED, last_modified)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 301 redirect (directory requested without its trailing slash)
pub fn build_301_response(location: &str) -> Response<Full<Bytes>> {
    let mut resp = text_response(StatusCode::MOVED_PERMANENTLY, "Redirecting...");
    match HeaderValue::from_str(location) {
        Ok(value) => {
            resp.headers_mut().insert(header::LOCATION, value);
            resp
        }
        Err(_) => build_404_response(),
    }
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    text_response(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 Method Not Allowed response listing the accepted methods
pub fn build_405_response(allow: &'static str) -> Response<Full<Bytes>> {
    let mut resp = text_response(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
    resp.headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static(allow));
    resp
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    text_response(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large")
}

/// 416 with `Content-Range: bytes */len`
pub fn build_416_response(len: u64) -> Response<Full<Bytes>> {
    let mut resp = text_response(StatusCode::RANGE_NOT_SATISFIABLE, "416 Range Not Satisfiable");
    if let Ok(value) = HeaderValue::from_str(&format!("bytes */{len}")) {
        resp.headers_mut().insert(header::CONTENT_RANGE, value);
    }
    resp
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
        .body(Full::new(Bytes::from_static(
            br#"{"error":"Internal server error"}"#,
        )))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from_static(b"Error"))))
}

/// Build OPTIONS response (CORS preflight)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(header::ALLOW, CORS_METHODS);

    if enable_cors {
        builder = builder
            .header(header::ACCESS_CONTROL_ALLOW_METHODS, CORS_METHODS)
            .header(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Range")
            .header(header::ACCESS_CONTROL_MAX_AGE, "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Metadata shared by full and partial file responses
pub struct FileHeaders<'a> {
    pub content_type: &'static str,
    pub etag: &'a str,
    pub last_modified: &'a str,
    pub max_age: u64,
}

/// Build 200 response for a whole file
pub fn build_file_response(data: Bytes, meta: &FileHeaders<'_>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, meta.content_type)
        .header(header::CONTENT_LENGTH, data.len())
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::ETAG, meta.etag)
        .header(header::LAST_MODIFIED, meta.last_modified)
        .header(header::CACHE_CONTROL, format!("public, max-age={}", meta.max_age))
        .body(Full::new(data))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 206 Partial Content response for `start..=end` of a `total` byte file
pub fn build_partial_response(
    data: Bytes,
    meta: &FileHeaders<'_>,
    start: u64,
    end: u64,
    total: u64,
) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, meta.content_type)
        .header(header::CONTENT_LENGTH, data.len())
        .header(header::CONTENT_RANGE, format!("bytes {start}-{end}/{total}"))
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::ETAG, meta.etag)
        .header(header::LAST_MODIFIED, meta.last_modified)
        .header(header::CACHE_CONTROL, format!("public, max-age={}", meta.max_age))
        .body(Full::new(data))
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_message_response_is_compact_json() {
        let resp = message_response("Event tracked successfully");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], JSON_CONTENT_TYPE);
        assert_eq!(
            body_text(resp).await,
            r#"{"message":"Event tracked successfully"}"#
        );
    }

    #[test]
    fn test_405_lists_allowed_methods() {
        let resp = build_405_response("GET, HEAD");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[header::ALLOW], "GET, HEAD");
    }

    #[test]
    fn test_416_reports_length() {
        let resp = build_416_response(1234);
        assert_eq!(resp.headers()[header::CONTENT_RANGE], "bytes */1234");
    }

    #[test]
    fn test_options_without_cors_has_no_cors_headers() {
        let resp = build_options_response(false);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(resp
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .is_none());
    }
}
