//! Response rendering for the HTTP transport.
//!
//! # Responsibilities
//! - Emit forwarded upstream headers, then `Content-Type` and `Content-length`
//! - Always answer 200; outcome signalling lives in the JSONP body
//! - Leave `x-request-id` to the request-ID layers, never the origin

use axum::body::Body;
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};

use crate::http::request::X_REQUEST_ID;
use crate::image::{JsonpResponse, JAVASCRIPT_CONTENT_TYPE};

impl IntoResponse for JsonpResponse {
    fn into_response(self) -> Response {
        let mut headers = self.forwarded;
        headers.remove(X_REQUEST_ID);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JAVASCRIPT_CONTENT_TYPE),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(self.body.len()));

        let mut response = Response::new(Body::from(self.body));
        *response.headers_mut() = headers;
        response
    }
}
