//! Ordered, first-match route resolution.
//!
//! A [`Router`] is a flat list of route rules built once at startup. For each
//! request the rules are evaluated in registration order, each against a fresh
//! [`MatchState`](filter::MatchState); the first rule whose whole filter chain
//! succeeds is the only one whose handler runs. A later, more specific rule
//! never wins over an earlier one that also matches.
//!
//! When no rule matches, the first non-silent [`Rejection`] recorded along the
//! way decides the answer (a 400 naming the missing input); without one the
//! answer is a 404.
//!
//! # Example
//! ```
//! use routekit_web::handler_fn;
//! use routekit_web::router::filter::{path_end, query_param};
//! use routekit_web::router::{Router, get};
//!
//! async fn hello() -> &'static str {
//!     "Hello world"
//! }
//!
//! let router = Router::builder()
//!     .route("/hello", get(handler_fn(hello)).with(path_end()))
//!     .nest("/junk", |scope| scope.route("/mine", get(handler_fn(hello))))
//!     .fallback(get(handler_fn(hello)))
//!     .build();
//!
//! assert_eq!(router.len(), 3);
//! ```

pub mod filter;
mod rejection;

pub use rejection::Rejection;

use std::fmt;
use std::panic::AssertUnwindSafe;

use bytes::Bytes;
use futures::FutureExt;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Response, StatusCode};
use mime::Mime;
use tracing::{error, trace, warn};

use crate::RequestContext;
use crate::bindings::Bindings;
use crate::body::ResponseBody;
use crate::error::HandlerError;
use crate::handler::RequestHandler;
use crate::responder::Responder;
use filter::{AllFilter, Filter, MatchState};

/// Main router structure that resolves requests against the rule list
#[derive(Debug)]
pub struct Router {
    items: Vec<RouterItem>,
}

/// One route rule: a filter chain, the handler it guards and an optional declared content type
pub struct RouterItem {
    filter: AllFilter,
    handler: Box<dyn RequestHandler>,
    content_type: Option<HeaderValue>,
}

/// Outcome of resolving one request
#[derive(Debug)]
pub enum RouteResult<'router> {
    Matched { item: &'router RouterItem, bindings: Bindings },
    Rejected(Rejection),
}

impl fmt::Debug for RouterItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterItem").field("filter", &self.filter).field("content_type", &self.content_type).finish()
    }
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finds the first rule whose filter chain matches `req`.
    ///
    /// No handler runs here. A miss is logged at `warn`: with a catch-all rule
    /// in place it can only mean the rule list is incomplete.
    pub fn resolve<'router>(&'router self, req: &RequestContext) -> RouteResult<'router> {
        let mut recorded: Option<Rejection> = None;

        for (index, item) in self.items.iter().enumerate() {
            let mut state = MatchState::new();
            match item.filter.check(req, &mut state) {
                Ok(()) => {
                    trace!(index, path = req.path(), "route rule matched");
                    return RouteResult::Matched { item, bindings: state.into_bindings() };
                }
                Err(rejection) => {
                    if recorded.is_none() && !rejection.is_silent() {
                        recorded = Some(rejection);
                    }
                }
            }
        }

        let rejection = recorded.unwrap_or(Rejection::NoMatch);
        warn!(method = %req.method(), path = req.path(), cause = %rejection, "no route rule matched");
        RouteResult::Rejected(rejection)
    }

    /// Resolves `req`, runs the matched handler and finalizes its response.
    ///
    /// A panicking handler is answered with a 500 and leaves the router usable.
    pub async fn respond(&self, req: RequestContext) -> Response<Bytes> {
        let (response, declared) = match self.resolve(&req) {
            RouteResult::Matched { item, bindings } => {
                match AssertUnwindSafe(item.handler.invoke(&req, bindings)).catch_unwind().await {
                    Ok(response) => (response, item.content_type.as_ref()),
                    Err(payload) => (HandlerError::panicked(payload.as_ref()).response_to(&req), None),
                }
            }
            RouteResult::Rejected(rejection) => (rejection.response_to(&req), None),
        };

        finalize(response, declared)
    }
}

/// Encodes an entity body and settles the content type.
///
/// The codec's content type is used unless the responder set one; a content
/// type declared on the rule replaces both for successful responses.
fn finalize(response: Response<ResponseBody>, declared: Option<&HeaderValue>) -> Response<Bytes> {
    let (mut parts, body) = response.into_parts();

    let body = match body.finalize() {
        Ok(body) => body,
        Err(e) => {
            error!(cause = %e, "can't encode response entity, send internal server error");
            return internal_server_error();
        }
    };

    if let Some(content_type) = body.content_type.as_ref().and_then(header_value) {
        parts.headers.entry(CONTENT_TYPE).or_insert(content_type);
    }

    if let Some(declared) = declared.filter(|_| parts.status.is_success()) {
        parts.headers.insert(CONTENT_TYPE, declared.clone());
    }

    Response::from_parts(parts, body.bytes)
}

fn header_value(mime: &Mime) -> Option<HeaderValue> {
    HeaderValue::from_str(mime.as_ref()).ok()
}

fn internal_server_error() -> Response<Bytes> {
    let mut response = Response::new(Bytes::from_static(b"internal server error"));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}

impl RouterItem {
    pub fn filter(&self) -> &dyn Filter {
        &self.filter
    }

    pub fn handler(&self) -> &dyn RequestHandler {
        self.handler.as_ref()
    }

    pub fn content_type(&self) -> Option<&HeaderValue> {
        self.content_type.as_ref()
    }
}

impl RouteResult<'_> {
    pub fn is_matched(&self) -> bool {
        matches!(self, RouteResult::Matched { .. })
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            RouteResult::Matched { .. } => None,
            RouteResult::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Collects route rules in registration order.
#[derive(Debug)]
pub struct RouterBuilder {
    items: Vec<RouterItemBuilder>,
    fallback: Option<RouterItemBuilder>,
}

impl RouterBuilder {
    fn new() -> Self {
        Self { items: vec![], fallback: None }
    }

    /// Appends a rule whose path must start with `route`.
    ///
    /// `route` is split into segment filters (`{name}` segments capture a path
    /// param) that run before the item's own filters. Without `path_end` the
    /// rule also matches longer paths.
    pub fn route(mut self, route: &str, mut item_builder: RouterItemBuilder) -> Self {
        item_builder.prepend_path(route);
        self.items.push(item_builder);
        self
    }

    /// Appends every rule built by `f` with `prefix` in front of its path.
    pub fn nest<F>(mut self, prefix: &str, f: F) -> Self
    where
        F: FnOnce(RouterBuilder) -> RouterBuilder,
    {
        let scope = f(RouterBuilder::new());
        for mut item_builder in scope.items.into_iter().chain(scope.fallback) {
            item_builder.prepend_path(prefix);
            self.items.push(item_builder);
        }
        self
    }

    /// Sets the rule evaluated after every other one, whatever order the builder calls came in.
    pub fn fallback(mut self, item_builder: RouterItemBuilder) -> Self {
        self.fallback = Some(item_builder);
        self
    }

    /// Builds the router from the accumulated rules
    pub fn build(self) -> Router {
        let items = self.items.into_iter().chain(self.fallback).map(RouterItemBuilder::build).collect();
        Router { items }
    }
}

macro_rules! method_router_filter {
    ($method:ident, $method_name:ident) => {
        #[doc = concat!("Starts a rule that matches `", stringify!($method), "` requests.")]
        pub fn $method<H: RequestHandler + 'static>(handler: H) -> RouterItemBuilder {
            let mut filters = filter::all_filter();
            filters.and(filter::$method_name());
            RouterItemBuilder::new(filters, handler)
        }
    };
}

method_router_filter!(get, get_method);
method_router_filter!(post, post_method);
method_router_filter!(put, put_method);
method_router_filter!(delete, delete_method);
method_router_filter!(head, head_method);
method_router_filter!(options, options_method);
method_router_filter!(patch, patch_method);

/// Starts a rule that matches every method.
pub fn any<H: RequestHandler + 'static>(handler: H) -> RouterItemBuilder {
    RouterItemBuilder::new(filter::all_filter(), handler)
}

pub struct RouterItemBuilder {
    path: Vec<Box<dyn Filter>>,
    filters: AllFilter,
    handler: Box<dyn RequestHandler>,
    content_type: Option<HeaderValue>,
}

impl fmt::Debug for RouterItemBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterItemBuilder")
            .field("path", &self.path.len())
            .field("filters", &self.filters)
            .field("content_type", &self.content_type)
            .finish()
    }
}

impl RouterItemBuilder {
    fn new<H: RequestHandler + 'static>(filters: AllFilter, handler: H) -> Self {
        Self { path: vec![], filters, handler: Box::new(handler), content_type: None }
    }

    /// Appends a filter to the rule's chain.
    pub fn with<F: Filter + 'static>(mut self, filter: F) -> Self {
        self.filters.and(filter);
        self
    }

    /// Declares the content type of the rule's successful responses.
    pub fn produces(mut self, mime: Mime) -> Self {
        self.content_type = match HeaderValue::from_str(mime.as_ref()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(cause = %e, mime = %mime, "can't use mime as content type, ignore it");
                None
            }
        };
        self
    }

    fn prepend_path(&mut self, route: &str) {
        let mut path = filter::path_filters(route);
        path.append(&mut self.path);
        self.path = path;
    }

    fn build(self) -> RouterItem {
        let mut filter = filter::all_filter();
        for path_filter in self.path {
            filter.push_boxed(path_filter);
        }
        filter.and(self.filters);
        RouterItem { filter, handler: self.handler, content_type: self.content_type }
    }
}
