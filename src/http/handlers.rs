//! Request handlers for the lane-change endpoints.
//!
//! # Endpoints
//! - `GET /` (and any unrouted path): serve the client's lane
//! - `GET /change`: current assignment, 404 when none
//! - `POST /change`: assign `{"lane": key, "duration": secs}`
//! - `DELETE /change`: clear the assignment
//! - `GET /config`: lane catalog and default key

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::http::client_addr::ClientKey;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{ChangeOutcome, ChangeRequest, DispatchError};

/// Applied to every served lane so clients re-resolve on each request.
pub const NO_CACHE: HeaderValue = HeaderValue::from_static("max-age=0, no-cache, no-store");

/// Body of `POST /change`.
#[derive(Debug, Deserialize)]
pub struct LaneChange {
    #[serde(default)]
    pub lane: String,

    /// Seconds; 0 or omitted applies the store's default retention.
    #[serde(default)]
    pub duration: u64,
}

pub async fn serve_lane(State(state): State<AppState>, client: ClientKey) -> Response {
    let start = Instant::now();
    let lane = state.dispatcher.serve(client.as_str());

    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, NO_CACHE);
    for (name, value) in &lane.headers {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(lane = %lane.key, header = %name, "Skipping invalid lane header"),
        }
    }

    tracing::debug!(client = %client, lane = %lane.key, "Serving lane");
    metrics::record_request("serve", StatusCode::OK.as_u16(), start);
    (headers, lane.content.clone()).into_response()
}

pub async fn query_assignment(State(state): State<AppState>, client: ClientKey) -> Response {
    let start = Instant::now();
    let outcome = state.dispatcher.change(client.as_str(), ChangeRequest::Query);
    finish("query", outcome, start)
}

pub async fn assign_lane(State(state): State<AppState>, client: ClientKey, body: Bytes) -> Response {
    let start = Instant::now();
    let outcome = serde_json::from_slice::<LaneChange>(&body)
        .map_err(|e| DispatchError::MalformedRequest(e.to_string()))
        .and_then(|change| {
            state.dispatcher.change(
                client.as_str(),
                ChangeRequest::Assign {
                    lane: change.lane,
                    duration_secs: change.duration,
                },
            )
        });

    if let Err(DispatchError::MalformedRequest(reason)) = &outcome {
        tracing::warn!(client = %client, reason = %reason, "Malformed lane change request");
    }
    finish("assign", outcome, start)
}

pub async fn clear_assignment(State(state): State<AppState>, client: ClientKey) -> Response {
    let start = Instant::now();
    let outcome = state.dispatcher.change(client.as_str(), ChangeRequest::Clear);
    finish("clear", outcome, start)
}

pub async fn introspect_catalog(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let response = Json(state.dispatcher.introspect()).into_response();
    metrics::record_request("config", response.status().as_u16(), start);
    response
}

fn finish(
    operation: &'static str,
    outcome: Result<ChangeOutcome, DispatchError>,
    start: Instant,
) -> Response {
    let response = match outcome {
        Ok(ChangeOutcome::Current(view)) => Json(view).into_response(),
        Ok(ChangeOutcome::Unassigned) => StatusCode::NOT_FOUND.into_response(),
        Ok(ChangeOutcome::Assigned(_)) | Ok(ChangeOutcome::Cleared) => StatusCode::OK.into_response(),
        Err(e) => e.into_response(),
    };
    metrics::record_request(operation, response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config, ConfigFormat};
    use crate::http::server::HttpServer;
    use axum::{body::Body, http::Request, Router};
    use tower::ServiceExt;

    const CONFIG: &str = r#"{
        "port": 8080,
        "default": "A",
        "lanes": {
            "A": { "headers": { "Content-Type": "text/html", "X-Lane": "A" }, "content": "<h1>A</h1>" },
            "B": { "headers": { "X-Lane": "B", "Cache-Control": "max-age=60" }, "content": "<h1>B</h1>" }
        }
    }"#;

    fn router() -> Router {
        let config = parse_config(CONFIG, ConfigFormat::Json).unwrap();
        HttpServer::new(config).unwrap().router()
    }

    fn request(method: &str, uri: &str, client: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("X-Forwarded-For", client)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_serve_default_lane() {
        let response = router()
            .oneshot(request("GET", "/", "1.2.3.4", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["cache-control"], "max-age=0, no-cache, no-store");
        assert_eq!(response.headers()["content-type"], "text/html");
        assert_eq!(response.headers()["x-lane"], "A");
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_string(response).await, "<h1>A</h1>");
    }

    #[tokio::test]
    async fn test_assign_then_serve_and_query() {
        let app = router();

        let response = app
            .clone()
            .oneshot(request("POST", "/change", "1.2.3.4", r#"{"lane": "B", "duration": 60}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.is_empty());

        // Unrouted paths are served too.
        let response = app
            .clone()
            .oneshot(request("GET", "/landing/page", "1.2.3.4", ""))
            .await
            .unwrap();
        assert_eq!(response.headers()["x-lane"], "B");
        // Lane headers override the default cache directive.
        assert_eq!(response.headers()["cache-control"], "max-age=60");
        assert_eq!(body_string(response).await, "<h1>B</h1>");

        let response = app
            .clone()
            .oneshot(request("GET", "/change", "1.2.3.4", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["lane"], "B");
        assert_eq!(json["ip"], "1.2.3.4");
        assert!(json["expires"].is_string());

        // Other clients are unaffected.
        let response = app
            .oneshot(request("GET", "/", "5.6.7.8", ""))
            .await
            .unwrap();
        assert_eq!(response.headers()["x-lane"], "A");
    }

    #[tokio::test]
    async fn test_query_without_assignment_is_not_found() {
        let response = router()
            .oneshot(request("GET", "/change", "1.2.3.4", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_string(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let response = router()
            .oneshot(request("POST", "/change", "1.2.3.4", "{\"lane\": "))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!body_string(response).await.is_empty());

        let response = router()
            .oneshot(request("POST", "/change", "1.2.3.4", r#"{"lane": "B", "duration": -5}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_lane_is_bad_request() {
        let app = router();
        let response = app
            .clone()
            .oneshot(request("POST", "/change", "1.2.3.4", r#"{"lane": "Z"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, "Error with request (Lane key invalid?)");

        let response = app
            .oneshot(request("GET", "/change", "1.2.3.4", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_clear_assignment() {
        let app = router();
        app.clone()
            .oneshot(request("POST", "/change", "1.2.3.4", r#"{"lane": "B"}"#))
            .await
            .unwrap();

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(request("DELETE", "/change", "1.2.3.4", ""))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(request("GET", "/", "1.2.3.4", ""))
            .await
            .unwrap();
        assert_eq!(response.headers()["x-lane"], "A");
    }

    #[tokio::test]
    async fn test_config_hides_port() {
        let response = router()
            .oneshot(request("GET", "/config", "1.2.3.4", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["default"], "A");
        assert_eq!(json["lanes"]["B"]["content"], "<h1>B</h1>");
        assert_eq!(json["lanes"]["A"]["headers"]["X-Lane"], "A");
        assert!(json.get("port").is_none());
    }
}
