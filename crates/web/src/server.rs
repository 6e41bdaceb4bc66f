//! TCP server glue: accept connections and answer every request through a [`Router`].

use std::convert::Infallible;
use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::DATE;
use http::{Request, Response};
use routekit_http::codec::DEFAULT_MAX_BODY_SIZE;
use routekit_http::connection::HttpConnection;
use routekit_http::handler::Handler;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::RequestContext;
use crate::date::DateService;
use crate::router::Router;

#[derive(Debug)]
pub struct ServerBuilder {
    router: Option<Router>,
    address: Option<String>,
    max_body_size: usize,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { router: None, address: None, max_body_size: DEFAULT_MAX_BODY_SIZE }
    }

    /// The address to listen on, `host:port`.
    pub fn bind(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Requests with a larger body are answered with 413.
    pub fn max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let router = self.router.ok_or(ServerBuildError::MissingRouter)?;
        let address = self.address.ok_or(ServerBuildError::MissingAddress)?;
        Ok(Server { router: Arc::new(router), address, max_body_size: self.max_body_size })
    }
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("router must be set")]
    MissingRouter,
    #[error("address must be set")]
    MissingAddress,
}

#[derive(Debug)]
pub struct Server {
    router: Arc<Router>,
    address: String,
    max_body_size: usize,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Binds the configured address and serves until the process ends.
    pub async fn start(self) -> io::Result<()> {
        let tcp_listener = TcpListener::bind(self.address.as_str()).await?;
        info!(address = %self.address, "start listening");
        self.serve(tcp_listener).await
    }

    /// Serves connections from an already bound listener, one task per connection.
    pub async fn serve(self, tcp_listener: TcpListener) -> io::Result<()> {
        let handler = Arc::new(RouterHandler { router: self.router, date_service: DateService::new() });
        let max_body_size = self.max_body_size;

        loop {
            let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                debug!(%remote_addr, "accept connection");
                let (reader, writer) = tcp_stream.into_split();
                let connection = HttpConnection::with_max_body_size(reader, writer, max_body_size);
                match connection.process(handler).await {
                    Ok(()) => info!(%remote_addr, "finished process, connection shutdown"),
                    Err(e) => error!(%remote_addr, cause = %e, "service has error, connection shutdown"),
                }
            });
        }
    }
}

/// Adapts a [`Router`] to the transport's [`Handler`] and stamps the `Date` header.
struct RouterHandler {
    router: Arc<Router>,
    date_service: DateService,
}

#[async_trait]
impl Handler for RouterHandler {
    type Error = Infallible;

    async fn call(&self, req: Request<Bytes>) -> Result<Response<Bytes>, Self::Error> {
        let mut response = self.router.respond(RequestContext::new(req)).await;
        if let Some(date) = self.date_service.header_value() {
            response.headers_mut().insert(DATE, date);
        }
        Ok(response)
    }
}
