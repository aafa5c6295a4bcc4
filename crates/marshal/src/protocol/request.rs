//! HTTP request types exchanged between marshallers.
//!
//! Protocol encoders produce a [`RequestHead`]: method, uri, version and headers with no
//! body attached. The streaming layer turns it into a [`MarshalledRequest`] carrying a
//! [`RequestPayload`].

use http::{HeaderMap, HeaderValue, Request, header};

use crate::protocol::body::RequestPayload;

/// Type alias for a request before any body is attached.
///
/// This uses `http::Request<()>` with an empty body placeholder, the same way a
/// response head is represented before its body is known.
pub type RequestHead = Request<()>;

/// Type alias for a request that is ready for the transport.
pub type MarshalledRequest = Request<RequestPayload>;

/// Returns the first `Content-Type` value if it is present and non-empty.
///
/// Header names are compared case-insensitively by `HeaderMap`, so a base encoder that
/// wrote `content-type` or `Content-Type` is treated the same.
pub fn first_content_type(headers: &HeaderMap) -> Option<&HeaderValue> {
    headers.get(header::CONTENT_TYPE).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_content_type() {
        let headers = HeaderMap::new();
        assert!(first_content_type(&headers).is_none());
    }

    #[test]
    fn empty_content_type_counts_as_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(""));
        assert!(first_content_type(&headers).is_none());
    }

    #[test]
    fn first_value_wins() {
        let mut headers = HeaderMap::new();
        headers.append("Content-Type", HeaderValue::from_static("application/xml"));
        headers.append("content-type", HeaderValue::from_static("text/plain"));

        assert_eq!(first_content_type(&headers), Some(&HeaderValue::from_static("application/xml")));
    }
}
