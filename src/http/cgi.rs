//! CGI transport.
//!
//! # Responsibilities
//! - Read request parameters from the CGI environment and stdin
//! - Write `Name: value` header lines, a blank line, then the JSONP body
//!
//! # Design Decisions
//! - Header lines end in `\n`, which RFC 3875 permits
//! - `Content-length` is written for successful responses only
//! - No `Status:` line; the web server answers 200

use std::io::{self, Read, Write};

use crate::image::{JsonpResponse, RequestParams, JAVASCRIPT_CONTENT_TYPE};

/// Request data pulled from the CGI environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CgiRequest {
    pub method: String,
    pub query: String,
    pub body: Vec<u8>,
}

impl CgiRequest {
    /// Build from environment lookups and the request body stream.
    ///
    /// Only POST requests read `CONTENT_LENGTH` bytes from `stdin`.
    pub fn from_env<F, R>(var: F, stdin: R) -> io::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
        R: Read,
    {
        let method = var("REQUEST_METHOD").unwrap_or_else(|| "GET".to_string());
        let query = var("QUERY_STRING").unwrap_or_default();

        let mut body = Vec::new();
        if method.eq_ignore_ascii_case("POST") {
            let length = var("CONTENT_LENGTH")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(0);
            stdin.take(length).read_to_end(&mut body)?;
        }

        Ok(Self { method, query, body })
    }

    /// Parameters in `FieldStorage` order: form body first, then query.
    pub fn params(&self) -> RequestParams {
        if self.method.eq_ignore_ascii_case("POST") {
            RequestParams::from_form(&self.body, &self.query)
        } else {
            RequestParams::from_query(&self.query)
        }
    }
}

/// Write a complete CGI response.
pub fn write_response<W: Write>(out: &mut W, response: &JsonpResponse) -> io::Result<()> {
    for (name, value) in &response.forwarded {
        out.write_all(name.as_str().as_bytes())?;
        out.write_all(b": ")?;
        out.write_all(value.as_bytes())?;
        out.write_all(b"\n")?;
    }

    writeln!(out, "Content-Type: {}", JAVASCRIPT_CONTENT_TYPE)?;
    if let Some(length) = response.content_length() {
        writeln!(out, "Content-length: {}", length)?;
    }
    out.write_all(b"\n")?;
    out.write_all(response.body.as_bytes())?;
    out.flush()
}
