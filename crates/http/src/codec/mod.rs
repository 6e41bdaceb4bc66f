//! Codecs turning raw bytes into requests and responses into raw bytes.
//!
//! - [`RequestDecoder`]: a tokio-util [`Decoder`](tokio_util::codec::Decoder) yielding
//!   complete `Request<Bytes>` values, body buffered
//! - [`ResponseEncoder`]: a tokio-util [`Encoder`](tokio_util::codec::Encoder) writing
//!   `Response<Bytes>` values with a `Content-Length` header

mod header;
mod request_decoder;
mod response_encoder;

pub use request_decoder::DEFAULT_MAX_BODY_SIZE;
pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
