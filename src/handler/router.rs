//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: preflight and body-size checks,
//! probe and API route matching, then the static file fallback.

use crate::config::{AppState, HttpConfig};
use crate::handler::{api, static_files};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{self, HeaderValue};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Conditional and range headers a static file lookup needs
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub if_none_match: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
    pub range_header: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    fn from_request<B>(req: &'a Request<B>) -> Self {
        let get = |name: header::HeaderName| req.headers().get(name).and_then(|v| v.to_str().ok());
        Self {
            path: req.uri().path(),
            if_none_match: get(header::IF_NONE_MATCH),
            if_modified_since: get(header::IF_MODIFIED_SINCE),
            range_header: get(header::RANGE),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Generic over the body so the same path serves `hyper::body::Incoming`
/// and in-memory bodies.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let is_head = req.method() == Method::HEAD;
    let http_config = &state.config.http;

    let mut response = if req.method() == Method::OPTIONS {
        http::build_options_response(http_config.enable_cors)
    } else if let Some(resp) = check_body_size(&req, http_config.max_body_size) {
        resp
    } else {
        route_request(req, &state).await
    };

    apply_common_headers(&mut response, http_config);

    if is_head {
        response = strip_body(response);
    }
    Ok(response)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get(header::CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Route request based on path
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = req.uri().path();

    // 0. Health probes (highest priority, always fast)
    let health = &state.config.health;
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        return http::build_health_response();
    }

    // 1. Storefront API
    if let Some(route) = api::ApiRoute::from_path(path) {
        return api::dispatch(route, req, state).await;
    }

    // 2. Static files, read-only methods only
    if !matches!(*req.method(), Method::GET | Method::HEAD) {
        logger::log_debug(&format!("No route for {} {path}", req.method()));
        return http::build_404_response();
    }
    let ctx = RequestContext::from_request(&req);
    static_files::serve(&ctx, &state.config.static_files).await
}

/// Headers every response carries: `Server` and, when enabled, CORS
fn apply_common_headers(response: &mut Response<Full<Bytes>>, http_config: &HttpConfig) {
    let headers = response.headers_mut();
    if let Ok(server) = HeaderValue::from_str(&http_config.server_name) {
        headers.insert(header::SERVER, server);
    }
    if http_config.enable_cors {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
    }
}

/// Drop the body of a HEAD response, keeping its `Content-Length`
fn strip_body(response: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
    let (mut parts, body) = response.into_parts();
    if !parts.headers.contains_key(header::CONTENT_LENGTH) {
        if let Some(len) = body.size_hint().exact() {
            parts.headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
        }
    }
    Response::from_parts(parts, Full::new(Bytes::new()))
}
