use crate::codec::header::HeaderEncoder;
use crate::protocol::SendError;
use bytes::{Bytes, BytesMut};
use http::Response;
use tokio_util::codec::Encoder;

/// Encodes a complete `Response<Bytes>`: header first, then the body.
#[derive(Debug, Default)]
pub struct ResponseEncoder {
    header_encoder: HeaderEncoder,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Encoder<Response<Bytes>> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: Response<Bytes>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (parts, body) = item.into_parts();
        let head = Response::from_parts(parts, ());

        self.header_encoder.encode((head, body.len()), dst)?;
        dst.extend_from_slice(&body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn encode_full_response() {
        let response = Response::builder().status(StatusCode::OK).body(Bytes::from_static(b"MINE!")).unwrap();

        let mut dst = BytesMut::new();
        ResponseEncoder::new().encode(response, &mut dst).unwrap();

        assert_eq!(&dst[..], &b"HTTP/1.1 200 OK\r\ncontent-length: 5\r\n\r\nMINE!"[..]);
    }

    #[test]
    fn encode_empty_body() {
        let response = Response::builder().status(StatusCode::NOT_FOUND).body(Bytes::new()).unwrap();

        let mut dst = BytesMut::new();
        ResponseEncoder::new().encode(response, &mut dst).unwrap();

        assert_eq!(&dst[..], &b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\n\r\n"[..]);
    }
}
