//! Route matchers.
//!
//! A route rule is a chain of [`Filter`]s evaluated left to right against one
//! request. Filters share a [`MatchState`]: a cursor over the path segments
//! and the [`Bindings`] collected so far. A filter either succeeds, possibly
//! consuming segments or binding values, or fails with a [`Rejection`].
//!
//! - method, path-segment, path-end and header-equals filters fail silently
//!   with [`Rejection::NoMatch`]
//! - required query parameters, required headers and body decoding fail with
//!   a rejection naming the input, which the router reports if nothing else
//!   matches
//!
//! # Examples
//!
//! ```
//! use routekit_web::router::filter::{all_filter, get_method, path, path_end, query_param};
//!
//! let mut filter = all_filter();
//! filter.and(get_method()).and(path("/params")).and(path_end()).and(query_param("req"));
//! ```

use std::fmt;
use std::marker::PhantomData;

use http::Method;

use crate::RequestContext;
use crate::bindings::{Bindings, Checkpoint, OptionalParam};
use crate::codec::{Codec, Entity};
use crate::router::Rejection;

/// Per-rule evaluation state: how many path segments are consumed and what has been bound.
///
/// The router creates a fresh state for every rule, so nothing a failed rule
/// consumed or bound leaks into the next one.
#[derive(Debug, Default)]
pub struct MatchState {
    cursor: usize,
    bindings: Bindings,
}

impl MatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next unconsumed path segment.
    pub fn next_segment<'r>(&self, req: &'r RequestContext) -> Option<&'r str> {
        req.segments().get(self.cursor).map(String::as_str)
    }

    /// Consumes one path segment.
    pub fn advance(&mut self) {
        self.cursor += 1;
    }

    pub fn consumed(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self, req: &RequestContext) -> usize {
        req.segments().len().saturating_sub(self.cursor)
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    pub fn into_bindings(self) -> Bindings {
        self.bindings
    }

    fn checkpoint(&self) -> (usize, Checkpoint) {
        (self.cursor, self.bindings.checkpoint())
    }

    fn rollback(&mut self, (cursor, checkpoint): (usize, Checkpoint)) {
        self.cursor = cursor;
        self.bindings.rollback(checkpoint);
    }
}

/// Core trait for request matching.
///
/// `check` must not look at anything but the request and the state it is
/// given; the same filter is shared by every connection task.
pub trait Filter: Send + Sync {
    fn check(&self, req: &RequestContext, state: &mut MatchState) -> Result<(), Rejection>;
}

impl<F: Filter + ?Sized> Filter for Box<F> {
    fn check(&self, req: &RequestContext, state: &mut MatchState) -> Result<(), Rejection> {
        (**self).check(req, state)
    }
}

/// A filter that wraps a predicate.
struct FnFilter<F: Fn(&RequestContext) -> bool>(F);

impl<F: Fn(&RequestContext) -> bool + Send + Sync> Filter for FnFilter<F> {
    fn check(&self, req: &RequestContext, _state: &mut MatchState) -> Result<(), Rejection> {
        if (self.0)(req) { Ok(()) } else { Err(Rejection::NoMatch) }
    }
}

/// Creates a filter from a predicate; `false` is a silent non-match.
///
/// ```
/// use routekit_web::router::filter::fn_filter;
///
/// let api_only = fn_filter(|req| req.path().starts_with("/api"));
/// ```
pub fn fn_filter<F>(f: F) -> impl Filter
where
    F: Fn(&RequestContext) -> bool + Send + Sync,
{
    FnFilter(f)
}

/// Creates a filter that always matches.
pub fn true_filter() -> TrueFilter {
    TrueFilter
}

/// A filter that always matches.
#[derive(Debug)]
pub struct TrueFilter;

impl Filter for TrueFilter {
    #[inline]
    fn check(&self, _req: &RequestContext, _state: &mut MatchState) -> Result<(), Rejection> {
        Ok(())
    }
}

/// Creates a new OR-composed filter chain.
pub fn any_filter() -> AnyFilter {
    AnyFilter::new()
}

/// Compose filters with OR logic.
///
/// Alternatives are tried in order and each starts from the state the chain
/// was in before it; the first one that succeeds keeps its consumed segments
/// and bindings. When all fail, the first non-silent rejection is returned.
/// An empty chain matches.
pub struct AnyFilter {
    filters: Vec<Box<dyn Filter>>,
}

impl AnyFilter {
    fn new() -> Self {
        Self { filters: vec![] }
    }

    /// Add a new filter to the OR chain.
    pub fn or<F: Filter + 'static>(&mut self, filter: F) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl fmt::Debug for AnyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyFilter").field("filters", &self.filters.len()).finish()
    }
}

impl Filter for AnyFilter {
    fn check(&self, req: &RequestContext, state: &mut MatchState) -> Result<(), Rejection> {
        if self.filters.is_empty() {
            return Ok(());
        }

        let mut recorded = None;
        for filter in &self.filters {
            let checkpoint = state.checkpoint();
            match filter.check(req, state) {
                Ok(()) => return Ok(()),
                Err(rejection) => {
                    state.rollback(checkpoint);
                    if recorded.is_none() && !rejection.is_silent() {
                        recorded = Some(rejection);
                    }
                }
            }
        }

        Err(recorded.unwrap_or(Rejection::NoMatch))
    }
}

/// Creates a new AND-composed filter chain.
pub fn all_filter() -> AllFilter {
    AllFilter::new()
}

/// Compose filters with AND logic.
///
/// Filters run in insertion order and the chain stops at the first failure.
/// An empty chain matches.
pub struct AllFilter {
    filters: Vec<Box<dyn Filter>>,
}

impl AllFilter {
    fn new() -> Self {
        Self { filters: vec![] }
    }

    /// Add a new filter to the AND chain.
    pub fn and<F: Filter + 'static>(&mut self, filter: F) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub(crate) fn push_boxed(&mut self, filter: Box<dyn Filter>) -> &mut Self {
        self.filters.push(filter);
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl fmt::Debug for AllFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllFilter").field("filters", &self.filters.len()).finish()
    }
}

impl Filter for AllFilter {
    fn check(&self, req: &RequestContext, state: &mut MatchState) -> Result<(), Rejection> {
        for filter in &self.filters {
            filter.check(req, state)?;
        }
        Ok(())
    }
}

/// A filter that matches HTTP methods.
#[derive(Debug)]
pub struct MethodFilter(Method);

impl Filter for MethodFilter {
    fn check(&self, req: &RequestContext, _state: &mut MatchState) -> Result<(), Rejection> {
        if self.0.eq(req.method()) { Ok(()) } else { Err(Rejection::NoMatch) }
    }
}

/// Creates a filter that matches one HTTP method.
pub fn method(method: Method) -> MethodFilter {
    MethodFilter(method)
}

macro_rules! method_filter {
    ($method:ident, $upper_case_method:ident) => {
        #[doc = concat!("Creates a filter that matches HTTP ", stringify!($upper_case_method), " requests.")]
        #[inline]
        pub fn $method() -> MethodFilter {
            MethodFilter(Method::$upper_case_method)
        }
    };
}

method_filter!(get_method, GET);
method_filter!(post_method, POST);
method_filter!(put_method, PUT);
method_filter!(delete_method, DELETE);
method_filter!(head_method, HEAD);
method_filter!(options_method, OPTIONS);
method_filter!(patch_method, PATCH);

/// Matches and consumes one literal path segment.
#[derive(Debug)]
pub struct SegmentFilter(String);

impl Filter for SegmentFilter {
    fn check(&self, req: &RequestContext, state: &mut MatchState) -> Result<(), Rejection> {
        match state.next_segment(req) {
            Some(segment) if segment == self.0 => {
                state.advance();
                Ok(())
            }
            _ => Err(Rejection::NoMatch),
        }
    }
}

pub fn segment(segment: impl Into<String>) -> SegmentFilter {
    SegmentFilter(segment.into())
}

/// Consumes any one path segment and binds it under a name.
#[derive(Debug)]
pub struct PathParamFilter(String);

impl Filter for PathParamFilter {
    fn check(&self, req: &RequestContext, state: &mut MatchState) -> Result<(), Rejection> {
        let value = state.next_segment(req).ok_or(Rejection::NoMatch)?;
        state.advance();
        state.bindings_mut().bind_path(self.0.as_str(), value);
        Ok(())
    }
}

pub fn path_param(name: impl Into<String>) -> PathParamFilter {
    PathParamFilter(name.into())
}

/// Matches only when every path segment has been consumed.
#[derive(Debug)]
pub struct PathEndFilter;

impl Filter for PathEndFilter {
    fn check(&self, req: &RequestContext, state: &mut MatchState) -> Result<(), Rejection> {
        if state.remaining(req) == 0 { Ok(()) } else { Err(Rejection::NoMatch) }
    }
}

pub fn path_end() -> PathEndFilter {
    PathEndFilter
}

/// Splits a route string into segment and path-param filters.
///
/// `/junk/mine` becomes two segment filters; a `{name}` segment becomes a
/// path-param filter. Empty segments are ignored, so `/`, `` and `//` produce
/// nothing.
pub fn path_filters(route: &str) -> Vec<Box<dyn Filter>> {
    route
        .split('/')
        .filter(|part| !part.is_empty())
        .map(|part| match part.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')) {
            Some(name) => Box::new(path_param(name)) as Box<dyn Filter>,
            None => Box::new(segment(part)),
        })
        .collect()
}

/// A prefix filter for a whole route string, see [`path_filters`].
pub fn path(route: &str) -> AllFilter {
    let mut filter = all_filter();
    for part in path_filters(route) {
        filter.push_boxed(part);
    }
    filter
}

/// Requires a query parameter and binds its value.
#[derive(Debug)]
pub struct QueryParamFilter(String);

impl Filter for QueryParamFilter {
    fn check(&self, req: &RequestContext, state: &mut MatchState) -> Result<(), Rejection> {
        let value = req.query().get(&self.0).ok_or_else(|| Rejection::missing_query_param(&self.0))?;
        state.bindings_mut().bind_query(self.0.as_str(), value);
        Ok(())
    }
}

pub fn query_param(name: impl Into<String>) -> QueryParamFilter {
    QueryParamFilter(name.into())
}

/// Binds an optional query parameter; never fails.
#[derive(Debug)]
pub struct OptionalQueryParamFilter(String);

impl Filter for OptionalQueryParamFilter {
    fn check(&self, req: &RequestContext, state: &mut MatchState) -> Result<(), Rejection> {
        let value = OptionalParam::from_value(req.query().get(&self.0));
        state.bindings_mut().bind_optional_query(self.0.as_str(), value);
        Ok(())
    }
}

pub fn optional_query_param(name: impl Into<String>) -> OptionalQueryParamFilter {
    OptionalQueryParamFilter(name.into())
}

/// Requires a header and binds its value; the name is matched case-insensitively.
#[derive(Debug)]
pub struct HeaderFilter(String);

impl Filter for HeaderFilter {
    fn check(&self, req: &RequestContext, state: &mut MatchState) -> Result<(), Rejection> {
        let value = req.headers().get(self.0.as_str()).ok_or_else(|| Rejection::missing_header(&self.0))?;
        let value = value.to_str().ok().ok_or_else(|| Rejection::malformed_header(&self.0))?;
        state.bindings_mut().bind_header(self.0.as_str(), value);
        Ok(())
    }
}

pub fn required_header(name: impl AsRef<str>) -> HeaderFilter {
    HeaderFilter(name.as_ref().to_ascii_lowercase())
}

/// Matches a header with an exact value; binds nothing.
#[derive(Debug)]
pub struct HeaderValueFilter {
    name: String,
    value: String,
}

impl Filter for HeaderValueFilter {
    fn check(&self, req: &RequestContext, _state: &mut MatchState) -> Result<(), Rejection> {
        match req.headers().get(self.name.as_str()) {
            Some(value) if value == self.value.as_str() => Ok(()),
            _ => Err(Rejection::NoMatch),
        }
    }
}

/// Creates a filter that matches a specific header name and value.
pub fn header(name: impl AsRef<str>, value: impl Into<String>) -> HeaderValueFilter {
    HeaderValueFilter { name: name.as_ref().to_ascii_lowercase(), value: value.into() }
}

/// Decodes the request body and binds the value as the entity.
pub struct BodyFilter<T, C> {
    codec: C,
    _phantom: PhantomData<fn() -> T>,
}

impl<T, C> fmt::Debug for BodyFilter<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyFilter").field("entity", &std::any::type_name::<T>()).finish_non_exhaustive()
    }
}

impl<T, C> Filter for BodyFilter<T, C>
where
    T: Send + Sync + 'static,
    C: Codec<T>,
{
    fn check(&self, req: &RequestContext, state: &mut MatchState) -> Result<(), Rejection> {
        let value = self.codec.decode(req.body()).map_err(Rejection::malformed_body)?;
        state.bindings_mut().bind_entity(value);
        Ok(())
    }
}

/// Decodes the body with the entity's registered codec.
pub fn body_as<T: Entity>() -> BodyFilter<T, T::Codec> {
    body_with(T::codec())
}

/// Decodes the body with an explicit codec.
pub fn body_with<T, C: Codec<T>>(codec: C) -> BodyFilter<T, C> {
    BodyFilter { codec, _phantom: PhantomData }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use bytes::Bytes;
    use http::Request;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Item {
        id: i64,
    }

    impl Entity for Item {
        type Codec = JsonCodec;
    }

    fn context(method: Method, uri: &str) -> RequestContext {
        Request::builder().method(method).uri(uri).body(Bytes::new()).unwrap().into()
    }

    fn check<F: Filter>(filter: &F, req: &RequestContext) -> (Result<(), Rejection>, MatchState) {
        let mut state = MatchState::new();
        let result = filter.check(req, &mut state);
        (result, state)
    }

    #[test]
    fn method_mismatch_is_silent() {
        let req = context(Method::POST, "/stuff");

        assert_eq!(check(&post_method(), &req).0, Ok(()));
        assert_eq!(check(&get_method(), &req).0, Err(Rejection::NoMatch));
    }

    #[test]
    fn segments_are_consumed_in_order() {
        let req = context(Method::GET, "/junk/mine");
        let mut state = MatchState::new();

        assert_eq!(segment("junk").check(&req, &mut state), Ok(()));
        assert_eq!(segment("yours").check(&req, &mut state), Err(Rejection::NoMatch));
        assert_eq!(segment("mine").check(&req, &mut state), Ok(()));
        assert_eq!(state.consumed(), 2);
        assert_eq!(path_end().check(&req, &mut state), Ok(()));
    }

    #[test]
    fn prefix_without_path_end_ignores_trailing_segments() {
        let req = context(Method::GET, "/stuff/extra");

        let (result, state) = check(&path("/stuff"), &req);
        assert_eq!(result, Ok(()));
        assert_eq!(state.remaining(&req), 1);

        let mut with_end = path("/stuff");
        with_end.and(path_end());
        assert_eq!(check(&with_end, &req).0, Err(Rejection::NoMatch));
    }

    #[test]
    fn root_route_has_no_segments() {
        assert!(path_filters("/").is_empty());
        assert!(path_filters("").is_empty());
        assert_eq!(path_filters("/junk//mine/").len(), 2);
    }

    #[test]
    fn path_param_binds_segment() {
        let req = context(Method::GET, "/stuff/17");

        let (result, state) = check(&path("/stuff/{id}"), &req);
        assert_eq!(result, Ok(()));
        assert_eq!(state.bindings().bound().path_param("id"), Some("17"));

        let short = context(Method::GET, "/stuff");
        assert_eq!(check(&path("/stuff/{id}"), &short).0, Err(Rejection::NoMatch));
    }

    #[test]
    fn required_query_param() {
        let (result, state) = check(&query_param("req"), &context(Method::GET, "/params?req=hi"));
        assert_eq!(result, Ok(()));
        assert_eq!(state.bindings().bound().query("req"), Some("hi"));

        let (result, _) = check(&query_param("req"), &context(Method::GET, "/params"));
        assert_eq!(result, Err(Rejection::missing_query_param("req")));
    }

    #[test]
    fn optional_query_param_never_fails() {
        let cases = [
            ("/params?opt=bye", OptionalParam::Present("bye".into())),
            ("/params?opt=", OptionalParam::Empty),
            ("/params", OptionalParam::Absent),
        ];

        for (uri, expected) in cases {
            let (result, state) = check(&optional_query_param("opt"), &context(Method::GET, uri));
            assert_eq!(result, Ok(()));
            assert_eq!(state.bindings().bound().optional_query("opt"), expected, "uri: {uri}");
        }
    }

    #[test]
    fn required_header_is_case_insensitive() {
        let req: RequestContext = Request::builder()
            .uri("/headers")
            .header("CT-Remote-User", "alice")
            .body(Bytes::new())
            .unwrap()
            .into();

        let (result, state) = check(&required_header("Ct-Remote-User"), &req);
        assert_eq!(result, Ok(()));
        assert_eq!(state.bindings().bound().header("ct-remote-user"), Some("alice"));

        let (result, _) = check(&required_header("x-missing"), &req);
        assert_eq!(result, Err(Rejection::missing_header("x-missing")));
    }

    #[test]
    fn non_ascii_header_is_malformed() {
        let req: RequestContext = Request::builder()
            .uri("/headers")
            .header("ct-remote-user", http::HeaderValue::from_bytes(b"al\xffce").unwrap())
            .body(Bytes::new())
            .unwrap()
            .into();

        let (result, _) = check(&required_header("ct-remote-user"), &req);
        assert_eq!(result, Err(Rejection::malformed_header("ct-remote-user")));
    }

    #[test]
    fn header_equals() {
        let req: RequestContext = Request::builder()
            .uri("/")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Bytes::new())
            .unwrap()
            .into();

        assert_eq!(check(&header("Content-Type", "application/json"), &req).0, Ok(()));
        assert_eq!(check(&header("content-type", "text/plain"), &req).0, Err(Rejection::NoMatch));
    }

    #[test]
    fn body_as_binds_entity() {
        let req: RequestContext =
            Request::builder().method(Method::POST).uri("/stuff").body(Bytes::from(r#"{"id":1}"#)).unwrap().into();

        let (result, state) = check(&body_as::<Item>(), &req);
        assert_eq!(result, Ok(()));
        assert_eq!(state.into_bindings().take_entity::<Item>(), Some(Item { id: 1 }));
    }

    #[test]
    fn undecodable_body_is_malformed() {
        let req: RequestContext =
            Request::builder().method(Method::POST).uri("/stuff").body(Bytes::from("not json")).unwrap().into();

        let (result, state) = check(&body_as::<Item>(), &req);
        assert!(matches!(result, Err(Rejection::MalformedBody(_))));
        assert!(!state.bindings().has_entity());
    }

    #[test]
    fn all_filter_short_circuits() {
        let req = context(Method::GET, "/params");
        let mut filter = all_filter();
        filter.and(post_method()).and(query_param("req"));

        assert_eq!(check(&filter, &req).0, Err(Rejection::NoMatch));
        assert_eq!(check(&all_filter(), &req).0, Ok(()));
    }

    #[test]
    fn any_filter_rolls_back_failed_alternatives() {
        let req = context(Method::GET, "/junk/yours");

        let mut mine = all_filter();
        mine.and(segment("junk")).and(segment("mine"));
        let mut yours = all_filter();
        yours.and(segment("junk")).and(segment("yours"));

        let mut filter = any_filter();
        filter.or(mine).or(yours);

        let (result, state) = check(&filter, &req);
        assert_eq!(result, Ok(()));
        assert_eq!(state.consumed(), 2);
    }

    #[test]
    fn any_filter_reports_first_recorded_rejection() {
        let req = context(Method::GET, "/params");
        let mut filter = any_filter();
        filter.or(post_method()).or(query_param("req")).or(required_header("ct-remote-user"));

        assert_eq!(check(&filter, &req).0, Err(Rejection::missing_query_param("req")));
    }

    #[test]
    fn fn_filter_predicate() {
        let filter = fn_filter(|req| req.path().starts_with("/junk"));

        assert_eq!(check(&filter, &context(Method::GET, "/junk/mine")).0, Ok(()));
        assert_eq!(check(&filter, &context(Method::GET, "/stuff")).0, Err(Rejection::NoMatch));
    }
}
