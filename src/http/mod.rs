//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers, route to the image endpoint)
//!     → request.rs (request ID generation)
//!     → image::Responder (validate, fetch, encode)
//!     → response.rs (JSONP body + headers)
//!     → Send to client
//!
//! CGI process (one request)
//!     → cgi.rs (environment + stdin → params)
//!     → image::Responder
//!     → cgi.rs (header lines + body on stdout)
//! ```

pub mod cgi;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
