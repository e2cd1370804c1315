//! JSONP rendering.
//!
//! # Responsibilities
//! - Wrap a `{"data": ...}` or `{"error": ...}` object in `callback(...)`
//! - Produce JSON byte-compatible with existing clients: `", "` and `": "`
//!   separators, non-ASCII escaped as `\uXXXX`
//!
//! # Design Decisions
//! - The callback name is emitted verbatim; an empty callback yields `(...)`
//! - Only successful responses carry a computed content length

use std::io;

use axum::http::HeaderMap;
use serde::Serialize;
use serde_json::ser::Formatter;

use crate::image::error::ProxyError;

/// Content type of every response body.
pub const JAVASCRIPT_CONTENT_TYPE: &str = "application/x-javascript";

/// The single JSON object passed to the callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Payload {
    Data(String),
    Error(String),
}

/// serde_json formatter mimicking Python's default `json.dumps` output.
#[derive(Debug, Default, Clone, Copy)]
pub struct PyCompatFormatter;

impl Formatter for PyCompatFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            if (ch as u32) < 0x7f {
                continue;
            }
            writer.write_all(fragment[start..idx].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = idx + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Render `callback(<payload json>)`.
pub fn render(callback: &str, payload: &Payload) -> Result<String, serde_json::Error> {
    let mut out = Vec::with_capacity(callback.len() + 64);
    out.extend_from_slice(callback.as_bytes());
    out.push(b'(');
    {
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, PyCompatFormatter);
        payload.serialize(&mut serializer)?;
    }
    out.push(b')');

    String::from_utf8(out).map_err(serde::ser::Error::custom)
}

/// Transport-neutral outcome of one request.
#[derive(Debug, Clone)]
pub struct JsonpResponse {
    /// Filtered upstream headers (empty for errors).
    pub forwarded: HeaderMap,
    /// `callback(...)` body.
    pub body: String,
    /// `"ok"` or the [`ProxyError::kind`] label.
    pub outcome: &'static str,
}

impl JsonpResponse {
    /// Successful proxy: carries the data URI and forwarded headers.
    pub fn image(callback: &str, data_uri: String, forwarded: HeaderMap) -> Self {
        Self {
            forwarded,
            body: render_or_fallback(callback, &Payload::Data(data_uri)),
            outcome: "ok",
        }
    }

    /// Any terminal error, rendered in the same envelope.
    pub fn error(callback: &str, err: &ProxyError) -> Self {
        Self {
            forwarded: HeaderMap::new(),
            body: render_or_fallback(callback, &Payload::Error(err.to_string())),
            outcome: err.kind(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == "ok"
    }

    /// Byte length announced in `Content-length`, emitted only on success.
    pub fn content_length(&self) -> Option<usize> {
        self.is_success().then_some(self.body.len())
    }
}

fn render_or_fallback(callback: &str, payload: &Payload) -> String {
    render(callback, payload).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to serialize JSONP payload");
        format!("{}({{\"error\": \"Internal error\"}})", callback)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::error::FetchError;

    #[test]
    fn test_error_body_matches_python_separators() {
        let body = render("cb", &Payload::Error("Invalid url".into())).unwrap();
        assert_eq!(body, r#"cb({"error": "Invalid url"})"#);
    }

    #[test]
    fn test_empty_callback_yields_bare_parens() {
        let body = render("", &Payload::Error("Invalid extension".into())).unwrap();
        assert_eq!(body, r#"({"error": "Invalid extension"})"#);
    }

    #[test]
    fn test_non_ascii_is_escaped() {
        let body = render("f", &Payload::Error("caf\u{e9} \u{1f600}\u{7f}".into())).unwrap();
        assert_eq!(body, r#"f({"error": "caf\u00e9 \ud83d\ude00\u007f"})"#);
    }

    #[test]
    fn test_control_chars_still_escaped() {
        let body = render("f", &Payload::Error("a\"b\nc".into())).unwrap();
        assert_eq!(body, r#"f({"error": "a\"b\nc"})"#);
    }

    #[test]
    fn test_formatter_lists_and_maps() {
        let value = serde_json::json!({"a": [1, 2], "b": {"c": true}});
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut out, PyCompatFormatter);
        value.serialize(&mut ser).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"{"a": [1, 2], "b": {"c": true}}"#
        );
    }

    #[test]
    fn test_content_length_only_on_success() {
        let ok = JsonpResponse::image("cb", "data:image/png;base64,AA==".into(), HeaderMap::new());
        assert_eq!(ok.content_length(), Some(ok.body.len()));
        assert_eq!(ok.body, r#"cb({"data": "data:image/png;base64,AA=="})"#);

        let err = JsonpResponse::error("cb", &ProxyError::Fetch(FetchError::Timeout(30)));
        assert_eq!(err.content_length(), None);
        assert_eq!(err.outcome, "fetch_failed");
        assert_eq!(
            err.body,
            r#"cb({"error": "Fetch failed: timed out after 30 seconds"})"#
        );
    }
}
