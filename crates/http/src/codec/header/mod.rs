//! Header codecs.
//!
//! - [`HeaderDecoder`]: request line and header fields from raw bytes, with size limits
//! - [`HeaderEncoder`]: status line and header fields to raw bytes, with `Content-Length`

mod header_decoder;
mod header_encoder;

pub use header_decoder::HeaderDecoder;
pub use header_encoder::HeaderEncoder;
