//! Origin fetching.
//!
//! # Responsibilities
//! - Issue one GET per request against the decoded target URL
//! - Enforce the per-request timeout passed in by the caller
//! - Buffer the full body and keep the response headers
//!
//! # Design Decisions
//! - No retries; every failure is terminal for the request
//! - Non-2xx statuses are failures, redirects are followed
//! - The timeout is an argument, not client-global state

use std::borrow::Cow;
use std::future::Future;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::{header, HeaderMap};
use url::Url;

use crate::config::FetchConfig;
use crate::image::error::FetchError;
use crate::observability::metrics;

/// A fully buffered origin response.
#[derive(Debug, Clone)]
pub struct UpstreamImage {
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl UpstreamImage {
    /// The upstream `Content-Type`, if it sent one.
    ///
    /// Values carrying non-ASCII (obs-text) bytes are decoded lossily
    /// rather than discarded.
    pub fn content_type(&self) -> Option<Cow<'_, str>> {
        let value = self.headers.get(header::CONTENT_TYPE)?;
        Some(match value.to_str() {
            Ok(text) => Cow::Borrowed(text),
            Err(_) => String::from_utf8_lossy(value.as_bytes()),
        })
    }
}

/// Something that can retrieve an image from an origin.
pub trait Fetch: Send + Sync {
    fn fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<UpstreamImage, FetchError>> + Send;
}

/// reqwest-backed fetcher sharing one connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<UpstreamImage, FetchError>> + Send {
        let client = self.client.clone();
        let target = Url::parse(url);

        async move {
            let target = target.map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
            if !matches!(target.scheme(), "http" | "https") {
                return Err(FetchError::InvalidUrl(format!(
                    "unsupported scheme `{}`",
                    target.scheme()
                )));
            }

            let start = Instant::now();
            let response = client
                .get(target)
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| classify(e, timeout))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status));
            }

            let headers = response.headers().clone();
            let body = response.bytes().await.map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(timeout.as_secs())
                } else {
                    FetchError::Body(e.to_string())
                }
            })?;

            metrics::record_fetch(start, body.len());
            tracing::debug!(
                status = %status,
                bytes = body.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Origin fetch complete"
            );

            Ok(UpstreamImage { headers, body })
        }
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(timeout.as_secs())
    } else if err.is_builder() {
        FetchError::InvalidUrl(err.to_string())
    } else {
        FetchError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn fetcher() -> HttpFetcher {
        let config = FetchConfig {
            use_system_proxy: false,
            ..FetchConfig::default()
        };
        HttpFetcher::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_non_http_scheme() {
        let err = fetcher()
            .fetch("file:///etc/passwd.png", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_rejects_relative_url() {
        let err = fetcher()
            .fetch("/local/a.png", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_content_type_lookup() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "image/gif".parse().unwrap());
        let upstream = UpstreamImage {
            headers,
            body: Bytes::from_static(b"GIF89a"),
        };
        assert_eq!(upstream.content_type().as_deref(), Some("image/gif"));
    }

    #[test]
    fn test_content_type_with_non_ascii_bytes() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_bytes("image/png; name=caf\u{e9}".as_bytes()).unwrap(),
        );
        let upstream = UpstreamImage {
            headers,
            body: Bytes::from_static(b"x"),
        };
        assert_eq!(
            upstream.content_type().as_deref(),
            Some("image/png; name=caf\u{e9}")
        );
    }
}
