//! Request parameter extraction.
//!
//! # Responsibilities
//! - Parse `url` and `callback` from a query string or urlencoded form body
//! - Keep only the first value of repeated parameters
//! - Percent-decode the target URL once more after form decoding
//!
//! # Design Decisions
//! - Blank values are dropped, so `url=` counts as a missing url
//! - Form body parameters take precedence over query parameters on POST

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use url::form_urlencoded;

use crate::image::error::ProxyError;

/// Raw parameters as they arrived, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    /// First non-blank `url` value, form-decoded.
    pub url: Option<String>,
    /// First non-blank `callback` value, or empty.
    pub callback: String,
}

impl RequestParams {
    /// Parse parameters from a raw (undecoded) query string.
    pub fn from_query(query: &str) -> Self {
        Self::from_pairs(form_urlencoded::parse(query.as_bytes()))
    }

    /// Parse parameters from an urlencoded body followed by the query string.
    pub fn from_form(body: &[u8], query: &str) -> Self {
        let body_pairs = form_urlencoded::parse(body);
        Self::from_pairs(body_pairs.chain(form_urlencoded::parse(query.as_bytes())))
    }

    fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
    {
        let mut params = RequestParams::default();
        let mut callback = None;

        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "url" if params.url.is_none() => params.url = Some(value.into_owned()),
                "callback" if callback.is_none() => callback = Some(value.into_owned()),
                _ => {}
            }
        }

        params.callback = callback.unwrap_or_default();
        params
    }

    /// Validate presence of the target and decode it.
    pub fn into_image_request(self) -> Result<ImageRequest, ProxyError> {
        let raw = self.url.ok_or(ProxyError::MissingUrl)?;
        let url = percent_decode_str(&raw).decode_utf8_lossy().into_owned();

        Ok(ImageRequest {
            url,
            callback: self.callback,
        })
    }
}

/// A validated-present, fully decoded image request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub url: String,
    pub callback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_values_win() {
        let params = RequestParams::from_query(concat!(
            "url=http%3A%2F%2Fa.com%2F1.png&url=http%3A%2F%2Fb.com%2F2.png",
            "&callback=cb1&callback=cb2",
        ));
        assert_eq!(params.url.as_deref(), Some("http://a.com/1.png"));
        assert_eq!(params.callback, "cb1");
    }

    #[test]
    fn test_missing_url() {
        let params = RequestParams::from_query("callback=cb");
        assert_eq!(params.callback, "cb");
        assert!(matches!(
            params.into_image_request(),
            Err(ProxyError::MissingUrl)
        ));
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let params = RequestParams::from_query("url=&callback=&url=http://x/y.gif");
        assert_eq!(params.url.as_deref(), Some("http://x/y.gif"));
        assert_eq!(params.callback, "");

        let params = RequestParams::from_query("url=");
        assert!(params.url.is_none());
    }

    #[test]
    fn test_double_decoding() {
        // %253A is form-decoded to %3A, then decoded again to ':'.
        let params = RequestParams::from_query("url=http%253A%252F%252Fexample.com%252Fa.png");
        let request = params.into_image_request().unwrap();
        assert_eq!(request.url, "http://example.com/a.png");
    }

    #[test]
    fn test_second_pass_keeps_plus() {
        let params = RequestParams::from_query("url=http://x.com/a%252Bb.png");
        let request = params.into_image_request().unwrap();
        assert_eq!(request.url, "http://x.com/a+b.png");
    }

    #[test]
    fn test_form_body_precedes_query() {
        let params = RequestParams::from_form(
            b"url=http%3A%2F%2Fbody.com%2Fa.png",
            "url=http%3A%2F%2Fquery.com%2Fb.png&callback=fromQuery",
        );
        assert_eq!(params.url.as_deref(), Some("http://body.com/a.png"));
        assert_eq!(params.callback, "fromQuery");
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(RequestParams::from_query(""), RequestParams::default());
    }
}
