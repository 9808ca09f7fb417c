//! Storefront JSON API
//!
//! Games and orders are answered straight from the catalog. Analytics
//! tracking parses whatever body it gets, logs it and always acknowledges.

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};

use crate::catalog::{AnalyticsEvent, Catalog};
use crate::config::AppState;
use crate::http;
use crate::logger;

pub const TRACK_ACK: &str = "Event tracked successfully";

/// Routes owned by the API, matched case-insensitively and with or without
/// a trailing slash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRoute {
    Games,
    Orders,
    TrackEvent,
    /// Per-service health check, carries its status message
    ServiceHealth(&'static str),
}

impl ApiRoute {
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.to_ascii_lowercase();
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path.as_str(),
        };
        match path {
            "/api/games" => Some(Self::Games),
            "/api/orders" => Some(Self::Orders),
            "/api/analytics/track" => Some(Self::TrackEvent),
            "/api/games/health" => Some(Self::ServiceHealth("Game Service is running")),
            "/api/orders/health" => Some(Self::ServiceHealth("Order Service is running")),
            "/api/analytics/health" => Some(Self::ServiceHealth("Analytics Service is running")),
            _ => None,
        }
    }

    /// Value of the `Allow` header when the method does not match
    pub const fn allowed_methods(self) -> &'static str {
        match self {
            Self::TrackEvent => "POST, OPTIONS",
            Self::Games | Self::Orders | Self::ServiceHealth(_) => "GET, HEAD, OPTIONS",
        }
    }
}

/// Run the handler for `route`, or answer 405 if the method is wrong
pub async fn dispatch<B>(route: ApiRoute, req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    match (route, method) {
        (ApiRoute::Games, Method::GET | Method::HEAD) => list_games(&state.catalog),
        (ApiRoute::Orders, Method::GET | Method::HEAD) => list_orders(&state.catalog),
        (ApiRoute::ServiceHealth(message), Method::GET | Method::HEAD) => {
            http::message_response(message)
        }
        (ApiRoute::TrackEvent, Method::POST) => {
            track_event(req.into_body(), state.config.http.max_body_size).await
        }
        (route, method) => {
            logger::log_warning(&format!("Method not allowed: {method} {}", req.uri().path()));
            http::build_405_response(route.allowed_methods())
        }
    }
}

fn list_games(catalog: &Catalog) -> Response<Full<Bytes>> {
    http::json_response(StatusCode::OK, catalog.games())
}

fn list_orders(catalog: &Catalog) -> Response<Full<Bytes>> {
    http::json_response(StatusCode::OK, catalog.orders())
}

/// Log the event carried by `body` and acknowledge it
///
/// Only an oversized body is refused. A body that fails mid-read is tracked
/// as an empty event.
async fn track_event<B>(body: B, max_body_size: u64) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let bytes = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_error(&format!(
                "Analytics body exceeds limit of {max_body_size} bytes"
            ));
            return http::build_413_response();
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read analytics body: {e}"));
            Bytes::new()
        }
    };

    let event = AnalyticsEvent::from_body(&bytes);
    logger::log_analytics_event(&event);
    http::message_response(TRACK_ACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_matching() {
        assert_eq!(ApiRoute::from_path("/api/games"), Some(ApiRoute::Games));
        assert_eq!(ApiRoute::from_path("/api/games/"), Some(ApiRoute::Games));
        assert_eq!(ApiRoute::from_path("/api/orders"), Some(ApiRoute::Orders));
        assert_eq!(
            ApiRoute::from_path("/api/analytics/track/"),
            Some(ApiRoute::TrackEvent)
        );
        assert_eq!(
            ApiRoute::from_path("/api/orders/health"),
            Some(ApiRoute::ServiceHealth("Order Service is running"))
        );
        assert_eq!(ApiRoute::from_path("/API/Games"), Some(ApiRoute::Games));
        assert_eq!(
            ApiRoute::from_path("/Api/Analytics/Track"),
            Some(ApiRoute::TrackEvent)
        );
        assert_eq!(ApiRoute::from_path("/api/games/1"), None);
        assert_eq!(ApiRoute::from_path("/api"), None);
        assert_eq!(ApiRoute::from_path("/"), None);
        assert_eq!(ApiRoute::from_path("/index.html"), None);
    }

    #[tokio::test]
    async fn test_track_event_rejects_only_oversized_bodies() {
        let small = Full::new(Bytes::from_static(b"{}"));
        assert_eq!(track_event(small, 16).await.status(), StatusCode::OK);

        let large = Full::new(Bytes::from(vec![b' '; 64]));
        assert_eq!(
            track_event(large, 16).await.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
