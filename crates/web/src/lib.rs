//! Ordered, first-match route resolution on top of `routekit-http`.
//!
//! A service is a list of route rules. Each rule is a chain of filters (method,
//! path segments, query parameters, headers, body decoding) plus an async
//! handler. Requests are resolved against the rules in registration order and
//! answered by the first rule that matches completely.
//!
//! # Example
//!
//! ```no_run
//! use routekit_web::bindings::Bound;
//! use routekit_web::router::filter::{optional_query_param, path_end, query_param};
//! use routekit_web::router::{Router, get};
//! use routekit_web::{RouteError, Server, handler_fn};
//!
//! async fn params(bound: Bound) -> Result<String, RouteError> {
//!     let req = bound.require_query("req")?;
//!     Ok(match bound.optional_query("opt").as_option() {
//!         Some(opt) => format!("Req: {req}, Opt: Some({opt})"),
//!         None => format!("Req: {req}, Opt: None"),
//!     })
//! }
//!
//! async fn hello() -> &'static str {
//!     "Hello world"
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let router = Router::builder()
//!         .route(
//!             "/params",
//!             get(handler_fn(params)).with(path_end()).with(query_param("req")).with(optional_query_param("opt")),
//!         )
//!         .fallback(get(handler_fn(hello)))
//!         .build();
//!
//!     Server::builder().router(router).bind("127.0.0.1:8080").build()?.start().await?;
//!     Ok(())
//! }
//! ```

pub mod bindings;
pub mod codec;
pub mod extract;
pub mod router;

mod body;
mod date;
mod error;
mod fn_trait;
mod handler;
mod request;
mod responder;
mod server;

pub use body::{EncodeEntity, FinalizedBody, ResponseBody};
pub use error::{HandlerError, RouteError};
pub use fn_trait::FnTrait;
pub use handler::{FnHandler, RequestHandler, handler_fn};
pub use request::{QueryParams, RequestContext};
pub use responder::Responder;
pub use router::Router;
pub use server::{Server, ServerBuildError, ServerBuilder};
