//! The request → validate → fetch → encode → respond pipeline.

use std::time::Duration;

use axum::http::HeaderMap;

use crate::config::FetchConfig;
use crate::image::encode::data_uri;
use crate::image::error::ProxyError;
use crate::image::fetch::Fetch;
use crate::image::headers::filter_upstream;
use crate::image::jsonp::JsonpResponse;
use crate::image::request::{ImageRequest, RequestParams};
use crate::image::validation::ExtensionPolicy;
use crate::observability::metrics;

/// A successfully proxied image, ready to be wrapped in JSONP.
#[derive(Debug, Clone)]
pub struct ProxiedImage {
    pub data_uri: String,
    pub headers: HeaderMap,
}

/// Turns request parameters into exactly one JSONP response.
#[derive(Debug, Clone)]
pub struct Responder<F> {
    fetcher: F,
    policy: ExtensionPolicy,
    fetch_timeout: Duration,
}

impl<F: Fetch> Responder<F> {
    pub fn new(fetcher: F, config: &FetchConfig) -> Self {
        Self {
            fetcher,
            policy: ExtensionPolicy::new(&config.allowed_extensions),
            fetch_timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Handle one request end to end. Never fails; errors become payloads.
    pub async fn respond(&self, params: RequestParams) -> JsonpResponse {
        let callback = params.callback.clone();

        let response = match params.into_image_request() {
            Ok(request) => match self.proxy(&request).await {
                Ok(image) => JsonpResponse::image(&callback, image.data_uri, image.headers),
                Err(err) => self.reject(&callback, Some(&request.url), err),
            },
            Err(err) => self.reject(&callback, None, err),
        };

        metrics::record_request(response.outcome);
        response
    }

    /// Validate and fetch a single image.
    pub async fn proxy(&self, request: &ImageRequest) -> Result<ProxiedImage, ProxyError> {
        if !self.policy.permits(&request.url) {
            return Err(ProxyError::InvalidExtension);
        }

        let upstream = self.fetcher.fetch(&request.url, self.fetch_timeout).await?;

        Ok(ProxiedImage {
            data_uri: data_uri(upstream.content_type().as_deref(), &upstream.body),
            headers: filter_upstream(&upstream.headers),
        })
    }

    fn reject(&self, callback: &str, url: Option<&str>, err: ProxyError) -> JsonpResponse {
        match &err {
            ProxyError::Fetch(cause) => {
                tracing::warn!(
                    url = url.unwrap_or_default(),
                    error = %cause,
                    "Origin fetch failed"
                );
            }
            _ => {
                tracing::debug!(
                    url = url.unwrap_or_default(),
                    reason = err.kind(),
                    "Request rejected"
                );
            }
        }
        JsonpResponse::error(callback, &err)
    }
}
