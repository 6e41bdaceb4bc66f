//! Request header handling.
//!
//! [`RequestHeader`] wraps a bodyless `http::Request<()>`; the decoder builds one
//! from the parsed request line and headers, works out the body framing from it
//! and finally attaches the buffered body with [`RequestHeader::body`].

use http::header::{CONNECTION, CONTENT_LENGTH, TRANSFER_ENCODING};
use http::request::Parts;
use http::{HeaderMap, HeaderValue, Method, Request, Uri, Version};

use crate::protocol::{ParseError, PayloadSize};

/// A parsed HTTP request without its body.
#[derive(Debug)]
pub struct RequestHeader {
    inner: Request<()>,
}

impl AsRef<Request<()>> for RequestHeader {
    fn as_ref(&self) -> &Request<()> {
        &self.inner
    }
}

impl RequestHeader {
    /// Consumes the header and returns the inner `Request<()>`.
    pub fn into_inner(self) -> Request<()> {
        self.inner
    }

    /// Attaches a body to this header, converting it into a full `Request<T>`.
    pub fn body<T>(self, body: T) -> Request<T> {
        self.inner.map(|()| body)
    }

    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    pub fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    pub fn version(&self) -> Version {
        self.inner.version()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Whether the connection may be reused after this request.
    ///
    /// HTTP/1.1 defaults to keep-alive unless `Connection: close` is sent,
    /// HTTP/1.0 only keeps the connection with an explicit `Connection: keep-alive`.
    pub fn keep_alive(&self) -> bool {
        let connection = self.headers().get(CONNECTION).map(HeaderValue::as_bytes);
        match self.version() {
            Version::HTTP_11 => !connection.is_some_and(|value| value.eq_ignore_ascii_case(b"close")),
            Version::HTTP_10 => connection.is_some_and(|value| value.eq_ignore_ascii_case(b"keep-alive")),
            _ => false,
        }
    }

    /// Determines how the body is framed, according to RFC 9112 section 6.
    ///
    /// Framing headers are honored for every method, a body on `GET` included,
    /// so the next request on the connection starts after it.
    pub fn payload_size(&self) -> Result<PayloadSize, ParseError> {
        let te_header = self.headers().get(TRANSFER_ENCODING);
        let cl_header = self.headers().get(CONTENT_LENGTH);

        match (te_header, cl_header) {
            (None, None) => Ok(PayloadSize::new_empty()),

            (Some(te_value), None) => {
                if is_chunked(te_value) {
                    Ok(PayloadSize::new_chunked())
                } else {
                    Ok(PayloadSize::new_empty())
                }
            }

            (None, Some(cl_value)) => {
                let cl_str = cl_value.to_str().map_err(|_| ParseError::invalid_content_length("value is not visible ascii"))?;
                let length = cl_str
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ParseError::invalid_content_length(format!("value {cl_str} is not u64")))?;
                Ok(PayloadSize::new_length(length))
            }

            (Some(_), Some(_)) => {
                Err(ParseError::invalid_content_length("transfer-encoding and content-length both present in headers"))
            }
        }
    }
}

/// `chunked` must be the last transfer coding when present.
fn is_chunked(value: &HeaderValue) -> bool {
    value.as_bytes().rsplit(|b| *b == b',').next().is_some_and(|last| last.trim_ascii().eq_ignore_ascii_case(b"chunked"))
}

impl From<Parts> for RequestHeader {
    #[inline]
    fn from(parts: Parts) -> Self {
        Self { inner: Request::from_parts(parts, ()) }
    }
}

impl From<Request<()>> for RequestHeader {
    #[inline]
    fn from(inner: Request<()>) -> Self {
        Self { inner }
    }
}
