//! Image proxy responder.
//!
//! # Data Flow
//! ```text
//! query string / form body
//!     → request.rs (first `url` / `callback`, double percent-decoding)
//!     → validation.rs (extension allow-list, syntactic only)
//!     → fetch.rs (one GET, per-request timeout, body buffered)
//!     → encode.rs (data:<mime>;base64,<payload>)
//!     → headers.rs (drop suppressed and hop-by-hop upstream headers)
//!     → jsonp.rs (callback({"data": ...}) or callback({"error": ...}))
//! ```
//!
//! # Design Decisions
//! - Exactly one payload per request; nothing is streamed
//! - Every failure, including fetch failures, is a structured JSONP error
//! - Signalling is entirely in the body; transports always answer 200

pub mod encode;
pub mod error;
pub mod fetch;
pub mod headers;
pub mod jsonp;
pub mod request;
pub mod responder;
pub mod validation;

pub use error::{FetchError, ProxyError};
pub use fetch::{Fetch, HttpFetcher, UpstreamImage};
pub use jsonp::{JsonpResponse, JAVASCRIPT_CONTENT_TYPE};
pub use request::{ImageRequest, RequestParams};
pub use responder::{ProxiedImage, Responder};
pub use validation::ExtensionPolicy;
