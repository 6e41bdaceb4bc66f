//! Connection handling.
//!
//! [`HttpConnection`] drives one client connection: it decodes requests,
//! calls the [`Handler`](crate::handler::Handler) and writes responses back,
//! keeping the connection alive when the protocol allows it.

mod http_connection;

pub use http_connection::HttpConnection;
