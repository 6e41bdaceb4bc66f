//! The buffered HTTP/1.1 transport behind routekit.
//!
//! This crate accepts bytes from an async stream, turns them into complete
//! `http::Request<Bytes>` values, hands each one to a [`handler::Handler`] and
//! writes the returned `http::Response<Bytes>` back. Request bodies are fully
//! buffered before the handler runs, which is what lets the route matchers in
//! `routekit-web` inspect the body synchronously.
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use http::{Request, Response, StatusCode};
//! use routekit_http::connection::HttpConnection;
//! use routekit_http::handler::make_handler;
//! use std::convert::Infallible;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn};
//!
//! #[tokio::main]
//! async fn main() {
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = Arc::new(make_handler(echo));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = Arc::clone(&handler);
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let connection = HttpConnection::new(reader, writer);
//!             if let Err(e) = connection.process(handler).await {
//!                 error!(cause = %e, "connection shutdown with error");
//!             }
//!             info!("connection closed");
//!         });
//!     }
//! }
//!
//! async fn echo(request: Request<Bytes>) -> Result<Response<Bytes>, Infallible> {
//!     let mut response = Response::new(request.into_body());
//!     *response.status_mut() = StatusCode::OK;
//!     Ok(response)
//! }
//! ```
//!
//! # Limitations
//!
//! - HTTP/1.0 and HTTP/1.1 only
//! - `Transfer-Encoding: chunked` request bodies are refused
//! - Maximum header size: 8KB, maximum number of headers: 64
//! - Request bodies are limited to 1MB unless configured otherwise

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
