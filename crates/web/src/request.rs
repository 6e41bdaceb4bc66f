//! The immutable request snapshot every route rule is evaluated against.
//!
//! - `RequestContext`: method, uri, headers, path segments, query parameters and the buffered body
//! - `QueryParams`: the decoded query string, single-valued

use bytes::Bytes;
use http::{HeaderMap, Method, Request, Uri, Version};
use routekit_http::protocol::RequestHeader;
use tracing::debug;

/// Everything the router knows about one request.
///
/// Built once per request by the server and shared by reference with every
/// filter and, after a match, with the handler. Nothing in it changes while
/// the rules are evaluated.
#[derive(Debug)]
pub struct RequestContext {
    request_header: RequestHeader,
    segments: Vec<String>,
    query: QueryParams,
    body: Bytes,
}

impl RequestContext {
    /// Splits the path into segments and decodes the query string.
    pub fn new(request: Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        let request_header = RequestHeader::from(parts);
        let segments = split_segments(request_header.uri().path());
        let query = request_header.uri().query().map(QueryParams::parse).unwrap_or_default();
        Self { request_header, segments, query, body }
    }

    /// Returns a reference to the underlying RequestHeader
    pub fn request_header(&self) -> &RequestHeader {
        &self.request_header
    }

    pub fn method(&self) -> &Method {
        self.request_header.method()
    }

    pub fn uri(&self) -> &Uri {
        self.request_header.uri()
    }

    pub fn path(&self) -> &str {
        self.request_header.uri().path()
    }

    pub fn version(&self) -> Version {
        self.request_header.version()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.request_header.headers()
    }

    /// Path segments in order, empty segments dropped: `/junk//mine/` is `["junk", "mine"]`.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

impl From<Request<Bytes>> for RequestContext {
    fn from(request: Request<Bytes>) -> Self {
        RequestContext::new(request)
    }
}

fn split_segments(path: &str) -> Vec<String> {
    path.split('/').filter(|segment| !segment.is_empty()).map(str::to_owned).collect()
}

/// Decoded query parameters.
///
/// Multi-valued parameters are not modeled: when a name repeats, the first
/// occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Decodes an `application/x-www-form-urlencoded` query string.
    ///
    /// A query string that can't be decoded is treated as empty.
    pub fn parse(query: &str) -> Self {
        match serde_urlencoded::from_str::<Vec<(String, String)>>(query) {
            Ok(pairs) => Self { pairs },
            Err(e) => {
                debug!(cause = %e, query, "can't decode query string, treat as empty");
                Self::default()
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
