//! HTTP request decoder.
//!
//! Decoding runs in two phases: the header is parsed by [`HeaderDecoder`], then
//! the decoder waits until the whole `Content-Length` body is in the buffer and
//! yields a complete `Request<Bytes>`.
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use routekit_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from("POST /stuff HTTP/1.1\r\nContent-Length: 2\r\n\r\n{}");
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(&request.body()[..], b"{}");
//! ```

use crate::codec::header::HeaderDecoder;
use crate::protocol::{ParseError, PayloadSize, RequestHeader};
use bytes::{Bytes, BytesMut};
use http::Request;
use tokio_util::codec::Decoder;
use tracing::trace;

/// Default limit for a buffered request body
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Decodes complete requests, body included.
///
/// The decoder keeps the parsed header in `pending` while it waits for the
/// rest of the body to arrive.
#[derive(Debug)]
pub struct RequestDecoder {
    header_decoder: HeaderDecoder,
    pending: Option<(RequestHeader, usize)>,
    max_body_size: usize,
}

impl RequestDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder that refuses bodies larger than `max_body_size` bytes.
    pub fn with_max_body_size(max_body_size: usize) -> Self {
        Self { header_decoder: HeaderDecoder, pending: None, max_body_size }
    }

    fn body_length(&self, payload_size: PayloadSize) -> Result<usize, ParseError> {
        match payload_size {
            PayloadSize::Empty => Ok(0),
            PayloadSize::Chunked => Err(ParseError::unsupported_encoding("chunked request bodies are not supported")),
            PayloadSize::Length(length) => match usize::try_from(length) {
                Ok(size) if size <= self.max_body_size => Ok(size),
                _ => Err(ParseError::too_large_body(length, self.max_body_size)),
            },
        }
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::with_max_body_size(DEFAULT_MAX_BODY_SIZE)
    }
}

impl Decoder for RequestDecoder {
    type Item = Request<Bytes>;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.pending.is_none() {
            let Some((header, payload_size)) = self.header_decoder.decode(src)? else {
                return Ok(None);
            };
            let length = self.body_length(payload_size)?;
            self.pending = Some((header, length));
        }

        let Some((_, length)) = &self.pending else {
            return Ok(None);
        };
        let length = *length;

        if src.len() < length {
            trace!(received = src.len(), expected = length, "waiting for the rest of the body");
            src.reserve(length - src.len());
            return Ok(None);
        }

        let body = src.split_to(length).freeze();
        Ok(self.pending.take().map(|(header, _)| header.body(body)))
    }
}
