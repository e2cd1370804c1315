//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the image endpoint and a health probe
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Bind server to listener and stop on the shutdown broadcast
//! - Hand each request to the image responder

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::{RawQuery, State},
    http::Request,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::request::{request_id_of, UuidRequestId};
use crate::image::{FetchError, HttpFetcher, JsonpResponse, RequestParams, Responder};
use crate::lifecycle::shutdown;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub responder: Arc<Responder<HttpFetcher>>,
}

/// HTTP server for the image proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        let state = AppState {
            responder: Arc::new(Responder::new(fetcher, &config.fetch)),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route(
                &config.listener.endpoint_path,
                get(get_image).post(post_image),
            )
            .route("/health", get(health))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id_of(request.headers())
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// Run the server until `shutdown_rx` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            endpoint_path = %self.config.listener.endpoint_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// A clone of the fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

async fn get_image(State(state): State<AppState>, RawQuery(query): RawQuery) -> JsonpResponse {
    let params = RequestParams::from_query(query.as_deref().unwrap_or_default());
    state.responder.respond(params).await
}

/// CGI-style POST: urlencoded body parameters first, then the query string.
async fn post_image(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> JsonpResponse {
    let params = RequestParams::from_form(&body, query.as_deref().unwrap_or_default());
    state.responder.respond(params).await
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let mut config = ProxyConfig::default();
        config.fetch.use_system_proxy = false;
        HttpServer::new(config).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_url_over_http() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/getImage?callback=cb")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/x-javascript"
        );
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_text(response).await, r#"cb({"error": "Invalid url"})"#);
    }

    #[tokio::test]
    async fn test_invalid_extension_over_http() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/getImage?url=http%3A%2F%2Fexample.com%2Fpage.html&callback=cb")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(body_text(response).await, r#"cb({"error": "Invalid extension"})"#);
    }

    #[tokio::test]
    async fn test_post_form_parameters() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/getImage?callback=fromQuery")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("url=http%3A%2F%2Fexample.com%2Fa.txt"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            body_text(response).await,
            r#"fromQuery({"error": "Invalid extension"})"#
        );
    }

    #[tokio::test]
    async fn test_client_request_id_is_echoed() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/getImage")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-42");
    }

    #[tokio::test]
    async fn test_health() {
        let response = server()
            .router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_custom_endpoint_path() {
        let mut config = ProxyConfig::default();
        config.listener.endpoint_path = "/cgi/getImage.py".into();
        config.fetch.use_system_proxy = false;
        let server = HttpServer::new(config).unwrap();

        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .uri("/cgi/getImage.py?callback=x")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(body_text(response).await, r#"x({"error": "Invalid url"})"#);
    }
}
