use std::sync::Arc;

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use http::header::CONNECTION;
use http::{HeaderValue, Response, StatusCode};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, info};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::handler::Handler;
use crate::protocol::{HttpError, RequestHeader};

/// One client connection: decode a request, let the handler answer it, encode the response.
///
/// Requests on the same connection are answered strictly in order. The loop ends
/// when the peer closes, asks for `Connection: close`, speaks HTTP/1.0 without
/// keep-alive, or sends something that can't be parsed.
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    framed_write: FramedWrite<W, ResponseEncoder>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_decoder(reader, writer, RequestDecoder::new())
    }

    pub fn with_max_body_size(reader: R, writer: W, max_body_size: usize) -> Self {
        Self::with_decoder(reader, writer, RequestDecoder::with_max_body_size(max_body_size))
    }

    fn with_decoder(reader: R, writer: W, decoder: RequestDecoder) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, decoder, 8 * 1024),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
        }
    }

    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
    {
        loop {
            match self.framed_read.next().await {
                Some(Ok(request)) => {
                    let (parts, body) = request.into_parts();
                    let header = RequestHeader::from(parts);
                    let keep_alive = header.keep_alive();
                    debug!(method = %header.method(), uri = %header.uri(), "receive request");

                    let response = match handler.call(header.body(body)).await {
                        Ok(response) => response,
                        Err(e) => {
                            let e = e.into();
                            error!(cause = %e, "handler failed, send internal server error");
                            build_error_response(StatusCode::INTERNAL_SERVER_ERROR)
                        }
                    };

                    self.do_send_response(response, keep_alive).await?;
                    if !keep_alive {
                        info!("connection is not keep-alive, close it");
                        return Ok(());
                    }
                }

                Some(Err(e)) => {
                    error!(cause = %e, "can't receive next request");
                    let error_response = build_error_response(e.status_code());
                    self.do_send_response(error_response, false).await?;
                    return Err(e.into());
                }

                None => {
                    info!("can't read more request, break this connection down");
                    return Ok(());
                }
            }
        }
    }

    async fn do_send_response(&mut self, mut response: Response<Bytes>, keep_alive: bool) -> Result<(), HttpError> {
        if !keep_alive {
            response.headers_mut().insert(CONNECTION, HeaderValue::from_static("close"));
        }
        self.framed_write.send(response).await?;
        Ok(())
    }
}

fn build_error_response(status_code: StatusCode) -> Response<Bytes> {
    let mut response = Response::new(Bytes::new());
    *response.status_mut() = status_code;
    response
}
