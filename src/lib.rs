//! JSONP Image Proxy Library
//!
//! Fetches a remote image and re-serves it as a base64 data URI wrapped in a
//! JSONP callback, over HTTP or CGI.

pub mod config;
pub mod devserver;
pub mod http;
pub mod image;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use image::{JsonpResponse, RequestParams, Responder};
pub use lifecycle::Shutdown;
