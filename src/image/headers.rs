//! Upstream header filtering.
//!
//! # Responsibilities
//! - Drop headers the proxy re-emits itself or that leak origin details
//! - Drop hop-by-hop headers that describe the upstream connection
//! - Forward everything else, keeping every value of repeated headers
//!
//! # Design Decisions
//! - Static deny-lists, compared case-insensitively
//! - `http::HeaderName` is already lower-case, but names are normalized
//!   anyway so the lists can be matched against arbitrary strings

use axum::http::HeaderMap;

/// Upstream headers never forwarded to the client.
pub const SUPPRESSED_HEADERS: &[&str] = &[
    "content-type",
    "via",
    "x-cache",
    "x-cache-lookup",
    "server",
    "accept-ranges",
    "content-length",
];

/// Connection-level headers that must not cross the proxy.
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "transfer-encoding",
    "te",
    "trailer",
    "upgrade",
    "proxy-connection",
    "proxy-authenticate",
    "content-encoding",
];

/// Returns true if a header with this name should reach the client.
pub fn is_forwarded(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    !SUPPRESSED_HEADERS.contains(&name.as_str()) && !HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Copy the forwardable subset of upstream headers.
pub fn filter_upstream(upstream: &HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::new();
    for (name, value) in upstream {
        if is_forwarded(name.as_str()) {
            forwarded.append(name.clone(), value.clone());
        }
    }
    forwarded
}
